pub mod init;
pub mod scenario;
