//! Interaction analytics: a JSONL log of chart callbacks and a reporter that
//! aggregates it for `launchdash history` and `GET /api/history`.

pub mod logger;
pub mod reporter;
