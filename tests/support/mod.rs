#![allow(dead_code)]

pub mod mock_backend;
pub mod wav;
pub mod yov_env;
