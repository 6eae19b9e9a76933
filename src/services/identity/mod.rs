pub mod resolver;
pub mod supabase;

pub use resolver::{Credential, IdentityResolver, ResolutionError, ResolvedIdentity};
pub use supabase::{ProviderError, SupabaseAuthClient};
