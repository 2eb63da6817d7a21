use crate::core::store::{PolicyMutations, Scope};
use actix_web::HttpMessage;

/// Per-request policy adjustments, recorded in the request extensions and
/// picked up by [`CspMiddleware`](crate::middleware::CspMiddleware) once the
/// handler has run.
pub trait CspExtensions {
    fn clear_csp_policy(&self, scope: Scope);

    fn add_to_csp_policy<I, V>(&self, scope: Scope, directive: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>;

    fn remove_from_csp_policy<I, V>(&self, scope: Scope, directive: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>;

    fn csp_mutations(&self) -> Option<PolicyMutations>;
}

impl<T> CspExtensions for T
where
    T: HttpMessage,
{
    fn clear_csp_policy(&self, scope: Scope) {
        update_mutations(self, |m| {
            m.clear(scope);
        });
    }

    fn add_to_csp_policy<I, V>(&self, scope: Scope, directive: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        update_mutations(self, |m| {
            m.add(scope, directive, values);
        });
    }

    fn remove_from_csp_policy<I, V>(&self, scope: Scope, directive: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        update_mutations(self, |m| {
            m.remove(scope, directive, values);
        });
    }

    fn csp_mutations(&self) -> Option<PolicyMutations> {
        self.extensions().get::<PolicyMutations>().cloned()
    }
}

fn update_mutations<T, F>(message: &T, f: F)
where
    T: HttpMessage,
    F: FnOnce(&mut PolicyMutations),
{
    let mut extensions = message.extensions_mut();
    match extensions.get_mut::<PolicyMutations>() {
        Some(mutations) => f(mutations),
        None => {
            let mut mutations = PolicyMutations::new();
            f(&mut mutations);
            extensions.insert(mutations);
        }
    }
}
