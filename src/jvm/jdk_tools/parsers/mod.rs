pub mod jcmd;
pub mod jstat;
