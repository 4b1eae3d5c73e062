//! Requests and responses for settling a hand, meant to travel as JSON.
//!
//! A front end sends a [`SettleRequest`] after each betting segment and a [`ShowdownRequest`]
//! once the winners are picked.

use potbook_core::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod settle;
pub mod showdown;

pub use settle::{SettleRequest, SettleResponse};
pub use showdown::{ShowdownRequest, ShowdownResponse};

pub type SeqNum = u32;

/// Wrapper for every request so they can be told apart on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub seq: SeqNum,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestBody {
    Settle(SettleRequest),
    Showdown(ShowdownRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub seq: SeqNum,
    pub body: Result<ResponseBody, RespErrCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponseBody {
    Settle(Box<SettleResponse>),
    Showdown(ShowdownResponse),
}

/// Error codes for requests that could not be answered at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RespErrCode {
    UnsupportedPlayerCount(usize),
    NoDealer,
    BadHandText(String),
}

impl fmt::Display for RespErrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPlayerCount(n) => write!(f, "Unsupported player count: {n}"),
            Self::NoDealer => write!(f, "No Dealer found in current hand"),
            Self::BadHandText(why) => write!(f, "Bad hand text: {why}"),
        }
    }
}

impl std::error::Error for RespErrCode {}

impl From<EngineError> for RespErrCode {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::UnsupportedPlayerCount(n) => Self::UnsupportedPlayerCount(n),
            EngineError::DealerNotFound => Self::NoDealer,
            EngineError::History(h) => Self::BadHandText(h.to_string()),
        }
    }
}

impl Request {
    pub fn handle(&self) -> Response {
        let body = match &self.body {
            RequestBody::Settle(r) => Ok(ResponseBody::Settle(Box::new(r.settle()))),
            RequestBody::Showdown(r) => r.resolve().map(ResponseBody::Showdown),
        };
        Response {
            seq: self.seq,
            body,
        }
    }
}
