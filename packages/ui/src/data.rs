//! Data context: the shared [`DataAccess`] plus hooks that turn its cached
//! queries into Dioxus resources.
//!
//! Every query resource also subscribes to a mutation epoch. A successful
//! mutation bumps it with [`Data::touch`]; mounted queries re-run and the cache
//! decides which of them actually reach the backend. The first run of a query
//! always refetches, so a view opened later shows changes made elsewhere.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use api::{ActorResult, DataAccess, HttpActor};
use dioxus::prelude::*;
use store::{Principal, QueryKey, SafeRideConfig};

use crate::auth::use_auth;
use crate::platform;

const IDLE_POLL: Duration = Duration::from_secs(1);

/// The actor used by the running app.
pub type PlatformActor = HttpActor;
pub type Access = DataAccess<PlatformActor>;

pub fn use_config() -> SafeRideConfig {
    use_context::<SafeRideConfig>()
}

#[derive(Clone, Copy)]
pub struct Data {
    access: Signal<Access>,
    epoch: Signal<u64>,
}

impl Data {
    /// Current access handle; subscribes the caller to identity changes.
    pub fn access(&self) -> Access {
        self.access.read().clone()
    }

    /// Current access handle without subscribing.
    pub fn peek(&self) -> Access {
        self.access.peek().clone()
    }

    pub fn epoch(&self) -> u64 {
        *self.epoch.read()
    }

    pub fn identity(&self) -> Option<Principal> {
        self.access.read().identity().cloned()
    }

    /// Re-run every mounted query after a mutation.
    pub fn touch(&mut self) {
        *self.epoch.write() += 1;
    }
}

pub fn use_data() -> Data {
    use_context::<Data>()
}

/// Keeps the data context in step with the signed-in identity.
/// Must be mounted below [`crate::AuthProvider`].
#[component]
pub fn DataProvider(children: Element) -> Element {
    let config = use_config();
    let auth = use_auth();
    let url = config.backend.url.clone();

    let mut access = use_signal(|| {
        DataAccess::new(HttpActor::new(url.clone()), None, config.polling.clone())
    });
    let epoch = use_signal(|| 0u64);

    use_effect(move || {
        let identity = auth().identity;
        let principal = identity.as_ref().map(|i| i.principal.clone());
        tracing::debug!(?principal, "data context identity");
        let actor = HttpActor::new(url.clone()).with_identity(identity);
        let current = access.peek().clone();
        if current.identity() != principal.as_ref() {
            current.clear();
        }
        access.set(current.with_actor(actor, principal));
    });

    use_context_provider(|| Data { access, epoch });

    rsx! {
        {children}
    }
}

/// A cached query as a resource. Refetches on mount, then re-runs when the
/// identity changes or after any mutation.
pub fn use_query<T, F, Fut>(mut fetch: F) -> Resource<ActorResult<T>>
where
    T: 'static,
    F: FnMut(Access) -> Fut + 'static,
    Fut: Future<Output = ActorResult<T>> + 'static,
{
    let data = use_data();
    let mounted = use_hook(|| Rc::new(Cell::new(false)));
    use_resource(move || {
        let access = data.access();
        let _ = data.epoch();
        if mounted.replace(true) {
            fetch(access)
        } else {
            fetch(access.refetching())
        }
    })
}

/// Refetch `resource` on the poll interval of the key's kind.
///
/// `key` is re-evaluated every cycle; `None` (e.g. signed out) skips the cycle.
/// Kinds without a poll interval never poll.
pub fn use_poll<T: 'static>(
    mut resource: Resource<T>,
    key: impl Fn(&Access) -> Option<QueryKey> + 'static,
) {
    let data = use_data();
    let key = use_hook(|| Rc::new(key));

    use_future(move || {
        let key = Rc::clone(&key);
        async move {
            loop {
                let access = data.peek();
                let Some(current) = key(&access) else {
                    platform::sleep(IDLE_POLL).await;
                    continue;
                };
                let Some(interval) = access.poll_interval(current.kind) else {
                    return;
                };
                platform::sleep(interval).await;
                data.peek().refresh(&current);
                resource.restart();
            }
        }
    });
}
