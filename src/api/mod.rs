pub mod itl_api;
