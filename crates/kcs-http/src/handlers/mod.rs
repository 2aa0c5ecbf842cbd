//! Route handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/register` | Public; any other method is 405 |
//! | `GET`  | `/api/admin/candidates` | Requires `x-admin-token`; other methods are 405 after auth |

pub mod candidates;
pub mod register;
