pub mod aggregate;
pub mod validator;
