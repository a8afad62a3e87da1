pub mod config;
pub mod init;
pub mod lookup;
pub mod run;
pub mod status;
pub mod update;
