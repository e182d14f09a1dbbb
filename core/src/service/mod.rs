pub mod dto;
pub mod ranking_service;
pub mod roster_service;
pub mod search_service;
pub mod trade_service;
