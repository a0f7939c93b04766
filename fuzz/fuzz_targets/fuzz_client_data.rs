#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate u2f_login;

use u2f_login::u2f::server::{client_data::ClientDataParser, LoginConfig};

fuzz_target!(|data: &[u8]| {
    let config = LoginConfig::new("https://example.com");
    let _ = ClientDataParser::new(&config).parse(data);
});
