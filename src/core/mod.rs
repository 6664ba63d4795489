pub mod article;
pub mod feed;
pub mod render;
pub mod storage;
pub mod updater;
