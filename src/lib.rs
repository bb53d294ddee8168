//! # Pordisto (Login Abuse Protection & Session Lifecycle)
//!
//! `pordisto` is the abuse-mitigation and session-lifecycle core shared by the
//! admin-facing services: a concurrent fixed-window rate limiter guarding the
//! login endpoint, and a background worker that closes sessions abandoned by
//! inactive users.
//!
//! ## Rate Limiting
//!
//! `ratelimit::Limiter` enforces "at most N operations per duration per key"
//! with **lazily reset windows**: a key's counter starts over the first time
//! the key is touched after its window expired, not on a wall-clock schedule.
//! A burst of `limit` operations at the tail of one window followed by `limit`
//! more at the head of the next is therefore possible; checks stay O(1) and no
//! per-operation timestamps are kept.
//!
//! `ratelimit::login::LoginLimiter` layers two limiters over a login endpoint:
//! one keyed by client IP (distributed brute force) and one keyed by
//! normalized email (targeted brute force). The IP check runs first and
//! short-circuits, so a blocked source can neither probe which accounts exist
//! nor drain a real user's email budget.
//!
//! **Proxy trust:** the client IP is taken from `X-Forwarded-For` /
//! `X-Real-IP` when present. Those headers are attacker-controlled unless a
//! trusted reverse proxy overwrites them in front of the service; without one,
//! IP-keyed limits can be bypassed with forged headers.
//!
//! ## Session Cleanup
//!
//! `session::cleanup::SessionCleanup` polls a `session::SessionStore` on a
//! fixed interval and closes sessions whose last activity is older than the
//! configured threshold. Store failures are logged and retried on the next
//! tick. Call `ensure_indexes` on the store once at startup, before spawning
//! the worker.
//!
//! Limiters and the worker spawn their background tasks on the ambient Tokio
//! runtime, so construct them inside one.

pub mod ratelimit;
pub mod session;

#[cfg(test)]
mod test_support;
