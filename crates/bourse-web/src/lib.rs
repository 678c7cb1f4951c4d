//! # Bourse Web
//!
//! HTTP API over the bourse session analytics.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | Service descriptor with routes and collaborator URLs |
//! | `GET /health` | Liveness plus store counts |
//! | `GET /api/stocks` | Instrument catalog |
//! | `GET /api/stocks/:code/history?days=N` | Newest N sessions, oldest first |
//! | `GET /api/stocks/:code/full-history?limit=N` | Oldest N sessions |
//! | `GET /api/stocks/:code/range?start=&end=` | Sessions between two dates |
//! | `GET /api/market/overview` | Latest session with change metrics |
//! | `GET /api/market/latest` | Latest session rows |
//! | `GET /api/market/dates` | Session dates, newest first |
//! | `GET /api/market/summary?top=N` | Breadth and top movers |
//!
//! Store reads are synchronous and run on tokio's blocking pool. Validation
//! failures answer 400, store failures 503 and anything else 500, each with
//! an `{"error", "status"}` JSON body.

pub mod app;
pub mod error;
pub mod routes;
pub mod state;

pub use app::build_router;
pub use error::ApiError;
pub use state::AppState;
