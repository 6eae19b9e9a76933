/*
 * Responsibility
 * - Router レベルの middleware (re-export)
 * - auth (認証 gate), cors, http (request id / trace / limits), security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
