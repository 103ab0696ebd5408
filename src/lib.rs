pub mod async_result;
pub mod data_coding;
pub mod esme;
pub mod framer;
pub mod multipart;
pub mod pdu;
pub mod receipt;
pub mod sequence;
pub mod session_store;
