#![allow(dead_code)]

pub mod mock_server;

use clipfetch::config::{Config, Endpoints};

pub const TIKTOK_API: &str = "/api/";
pub const SHOPEE_API: &str = "/api/shopee/video";
pub const SHOPEE_ITEM_API: &str = "/api/v4/item/get";

/// Config with every upstream pointed at `server`
pub fn config_for(server: &mock_server::MockServer) -> Config {
    Config {
        request_timeout_secs: 5,
        short_link_markers: vec![format!("{}/short/", server.base())],
        endpoints: Endpoints {
            tiktok_api: server.url(TIKTOK_API),
            shopee_api: server.url(SHOPEE_API),
            shopee_item_api: server.url(SHOPEE_ITEM_API),
        },
        ..Config::default()
    }
}
