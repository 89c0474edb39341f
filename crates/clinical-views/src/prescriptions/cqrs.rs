use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use cqrs_es::{
    mem_store::MemStore,
    persist::{PersistenceError, ViewContext, ViewRepository},
    CqrsFramework,
};

use crate::event::EventLog;

use super::{EntryPanel, Query, Services, View};

pub type PanelFramework = CqrsFramework<EntryPanel, MemStore<EntryPanel>>;

pub type PanelRepository = Arc<Box<dyn ViewRepository<View, EntryPanel>>>;

pub fn init(repo: PanelRepository, services: Services, log: EventLog) -> Arc<PanelFramework> {
    let store = MemStore::<EntryPanel>::default();

    let queries: Vec<Box<dyn cqrs_es::Query<EntryPanel>>> =
        vec![Box::new(Query::new(repo)), Box::new(log)];

    Arc::new(CqrsFramework::new(store, queries, services))
}

pub fn init_repo() -> PanelRepository {
    Arc::new(Box::new(MemViewRepository::default()))
}

/// Panel views for the lifetime of the page, versioned per panel id.
#[derive(Debug, Default)]
pub struct MemViewRepository {
    views: Mutex<HashMap<String, (View, i64)>>,
}

impl MemViewRepository {
    fn views(&self) -> Result<MutexGuard<'_, HashMap<String, (View, i64)>>, PersistenceError> {
        self.views
            .lock()
            .map_err(|err| PersistenceError::UnknownError(err.to_string().into()))
    }
}

#[async_trait]
impl ViewRepository<View, EntryPanel> for MemViewRepository {
    async fn load(&self, view_id: &str) -> Result<Option<View>, PersistenceError> {
        Ok(self
            .load_with_context(view_id)
            .await?
            .map(|(view, _)| view))
    }

    async fn load_with_context(
        &self,
        view_id: &str,
    ) -> Result<Option<(View, ViewContext)>, PersistenceError> {
        let views = self.views()?;
        Ok(views.get(view_id).map(|(view, version)| {
            (view.clone(), ViewContext::new(view_id.to_string(), *version))
        }))
    }

    async fn update_view(&self, view: View, context: ViewContext) -> Result<(), PersistenceError> {
        let mut views = self.views()?;
        let stored_version = views
            .get(&context.view_instance_id)
            .map_or(0, |(_, version)| *version);

        if stored_version != context.version {
            return Err(PersistenceError::OptimisticLockError);
        }

        views.insert(context.view_instance_id, (view, context.version + 1));
        Ok(())
    }
}
