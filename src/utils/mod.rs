pub mod response_ops;
