pub mod corpus;
pub mod password;
pub mod remote;
pub mod user;
