pub mod api_server;
pub mod claim_page;
pub mod intake;
pub mod page_loop;
pub mod presenter;
pub mod session_controller;
pub mod widget;
