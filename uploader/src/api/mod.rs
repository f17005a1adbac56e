pub mod qiniu;
pub mod requests;
pub mod responses;
