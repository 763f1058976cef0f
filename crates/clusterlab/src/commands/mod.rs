pub mod create;
pub mod delete_config;
pub mod destroy;
pub mod list;
pub mod restart;
pub mod ssh;
pub mod status;
pub mod stop;
pub mod up;
pub mod update_config;
