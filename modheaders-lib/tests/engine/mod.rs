mod controller;
mod signal_loop;

use modheaders_lib::config::{to_json, Config, StoredRule};
use modheaders_lib::engine::RequestDetails;
use modheaders_lib::rewriter::Header;

fn request(url: &str) -> RequestDetails {
    RequestDetails { url: url.to_string(), request_headers: vec![Header::new("Accept", "*/*")] }
}

fn config_with(rules: Vec<StoredRule>) -> Result<String, modheaders_lib::ModHeadersError> {
    to_json(&Config { headers: rules, ..Config::default() })
}
