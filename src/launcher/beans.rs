use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Typed registry of the singletons a running application exposes.
///
/// One instance per type; registering a type again replaces the previous bean.
#[derive(Clone, Default)]
pub struct BeanRegistry {
    beans: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl BeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Send + Sync + 'static>(&self, bean: T) -> &Self {
        self.register_arc(Arc::new(bean))
    }

    pub fn register_arc<T: Send + Sync + 'static>(&self, bean: Arc<T>) -> &Self {
        if self.beans.insert(TypeId::of::<T>(), bean).is_some() {
            tracing::debug!("Replaced bean {}", std::any::type_name::<T>());
        }
        self
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let bean = self.beans.get(&TypeId::of::<T>())?.value().clone();
        bean.downcast::<T>().ok()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.beans.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

impl std::fmt::Debug for BeanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanRegistry")
            .field("beans", &self.beans.len())
            .finish()
    }
}
