pub mod portfolio_api;
