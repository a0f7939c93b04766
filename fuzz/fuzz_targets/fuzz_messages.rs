#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate u2f_login;

use u2f_login::u2f::proto::raw_message::{AuthenticateResponse, Message};
use u2f_login::u2f::proto::raw_message::apdu::{ApduFrame, Response};

fuzz_target!(|data: &[u8]| {
    let _ = AuthenticateResponse::from_bytes(data);

    if let Ok(rsp) = Response::read_from(data) {
        let _ = AuthenticateResponse::from_apdu(rsp);
    };
});
