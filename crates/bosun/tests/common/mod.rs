//! In-memory base service and runtime used by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use bosun::{
    BaseService, BosunError, BosunResult, ClientFactory, ContainerInfo, ContainerName,
    ContainerRef, DependencyIndex, ExitReceiver, ImageInfo, LifecycleOptions, LifecycleService,
    Lookup, Relationship, RuntimeClient, ServiceConfig, ServiceFactory, ServiceName,
};
use parking_lot::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
struct FakeContainer {
    id: String,
    name: String,
    service: String,
}

#[derive(Default)]
struct State {
    images: HashSet<String>,
    image_error: Option<String>,
    containers: Vec<FakeContainer>,
    ghosts: Vec<(String, String)>,
    exits: HashMap<String, Result<i64, String>>,
    closed: HashSet<String>,
    pending: Vec<oneshot::Sender<BosunResult<i64>>>,
    fail_on: HashSet<String>,
    calls: Vec<String>,
}

/// A runtime that keeps containers and images in memory and records calls.
#[derive(Default)]
pub struct FakeRuntime {
    state: Mutex<State>,
}

impl FakeRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_image(&self, reference: &str) {
        self.state.lock().images.insert(reference.to_string());
    }

    pub fn fail_image_inspection(&self, message: &str) {
        self.state.lock().image_error = Some(message.to_string());
    }

    /// Register a container for `service` with a raw runtime name (e.g. `/old_web_1`).
    pub fn add_container(&self, service: &str, id: &str, raw_name: &str) {
        self.state.lock().containers.push(FakeContainer {
            id: id.to_string(),
            name: raw_name.to_string(),
            service: service.to_string(),
        });
    }

    /// A container the base service lists but the runtime no longer knows.
    pub fn add_ghost(&self, service: &str, id: &str) {
        self.state
            .lock()
            .ghosts
            .push((service.to_string(), id.to_string()));
    }

    pub fn set_exit(&self, id: &str, code: i64) {
        self.state.lock().exits.insert(id.to_string(), Ok(code));
    }

    pub fn set_exit_error(&self, id: &str, message: &str) {
        self.state
            .lock()
            .exits
            .insert(id.to_string(), Err(message.to_string()));
    }

    /// Drop the exit notification for `id` without sending a status.
    pub fn close_exit(&self, id: &str) {
        self.state.lock().closed.insert(id.to_string());
    }

    /// Make the named operation (`create`, `start`, `rename`, ...) fail.
    pub fn fail_on(&self, operation: &str) {
        self.state.lock().fail_on.insert(operation.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn container_name(&self, id: &str) -> Option<String> {
        self.state
            .lock()
            .containers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    }

    fn record(&self, call: String) {
        self.state.lock().calls.push(call);
    }

    fn check(&self, operation: &str) -> BosunResult<()> {
        if self.state.lock().fail_on.contains(operation) {
            return Err(BosunError::runtime(operation, "injected failure"));
        }
        Ok(())
    }

    fn containers_for(&self, service: &str) -> Vec<ContainerRef> {
        let state = self.state.lock();
        state
            .containers
            .iter()
            .filter(|c| c.service == service)
            .map(|c| ContainerRef::new(c.id.clone()))
            .chain(
                state
                    .ghosts
                    .iter()
                    .filter(|(s, _)| s == service)
                    .map(|(_, id)| ContainerRef::new(id.clone())),
            )
            .collect()
    }
}

#[async_trait]
impl RuntimeClient for FakeRuntime {
    async fn inspect_image(&self, reference: &str) -> BosunResult<Lookup<ImageInfo>> {
        self.record(format!("inspect_image:{reference}"));
        let state = self.state.lock();
        if let Some(message) = &state.image_error {
            return Err(BosunError::runtime("inspect_image", message));
        }
        if state.images.contains(reference) {
            Ok(Lookup::Present(ImageInfo {
                id: format!("sha256:{reference}"),
            }))
        } else {
            Ok(Lookup::Absent)
        }
    }

    async fn inspect_container(&self, id: &str) -> BosunResult<Lookup<ContainerInfo>> {
        self.record(format!("inspect_container:{id}"));
        self.check("inspect_container")?;
        let state = self.state.lock();
        Ok(state
            .containers
            .iter()
            .find(|c| c.id == id)
            .map_or(Lookup::Absent, |c| {
                Lookup::Present(ContainerInfo {
                    id: c.id.clone(),
                    name: ContainerName::new(c.name.clone()),
                })
            }))
    }

    async fn rename_container(&self, old_name: &str, new_name: &str) -> BosunResult<()> {
        self.record(format!("rename:{old_name}->{new_name}"));
        self.check("rename")?;
        let mut state = self.state.lock();
        match state
            .containers
            .iter_mut()
            .find(|c| c.name.strip_prefix('/').unwrap_or(&c.name) == old_name)
        {
            Some(container) => {
                container.name = format!("/{new_name}");
                Ok(())
            }
            None => Err(BosunError::ContainerNotFound {
                id: old_name.to_string(),
            }),
        }
    }

    fn wait(&self, id: &str) -> ExitReceiver {
        self.record(format!("wait:{id}"));
        let (tx, rx) = oneshot::channel();
        let mut state = self.state.lock();
        if state.closed.contains(id) {
            drop(tx);
            return rx;
        }
        match state.exits.get(id).cloned() {
            Some(Ok(code)) => {
                let _ = tx.send(Ok(code));
            }
            Some(Err(message)) => {
                let _ = tx.send(Err(BosunError::runtime("wait", message)));
            }
            // Never exits: keep the sender alive.
            None => state.pending.push(tx),
        }
        rx
    }
}

/// A base service backed by [`FakeRuntime`].
pub struct FakeService {
    name: ServiceName,
    config: ServiceConfig,
    relationships: Vec<Relationship>,
    runtime: Arc<FakeRuntime>,
}

impl FakeService {
    pub fn new(runtime: &Arc<FakeRuntime>, name: &str, config: ServiceConfig) -> Self {
        Self {
            name: ServiceName::new(name).unwrap(),
            config,
            relationships: Vec::new(),
            runtime: Arc::clone(runtime),
        }
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }
}

#[async_trait]
impl BaseService for FakeService {
    fn name(&self) -> &ServiceName {
        &self.name
    }

    fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn dependent_services(&self) -> Vec<Relationship> {
        self.relationships.clone()
    }

    async fn containers(&self) -> BosunResult<Vec<ContainerRef>> {
        self.runtime.check("containers")?;
        Ok(self.runtime.containers_for(self.name.as_str()))
    }

    async fn create(&self) -> BosunResult<()> {
        self.runtime.record(format!("create:{}", self.name));
        if self.runtime.check("create").is_err() {
            return Err(BosunError::Service {
                service: self.name.to_string(),
                operation: "create".to_string(),
                message: "injected failure".to_string(),
            });
        }
        if self.runtime.containers_for(self.name.as_str()).is_empty() {
            self.runtime.add_container(
                self.name.as_str(),
                &format!("{}-id", self.name),
                &format!("/bosun_{}_1", self.name),
            );
        }
        Ok(())
    }

    async fn up(&self) -> BosunResult<()> {
        self.runtime.record(format!("start:{}", self.name));
        if self.runtime.check("start").is_err() {
            return Err(BosunError::Service {
                service: self.name.to_string(),
                operation: "start".to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

pub fn name(s: &str) -> ServiceName {
    ServiceName::new(s).unwrap()
}

pub fn factory(runtime: &Arc<FakeRuntime>, deps: DependencyIndex) -> ServiceFactory {
    let client: Arc<dyn RuntimeClient> = Arc::clone(runtime) as Arc<dyn RuntimeClient>;
    let clients: Arc<dyn ClientFactory> = Arc::new(client);
    ServiceFactory::new(deps, clients)
}

/// A lifecycle service with no declared dependencies.
pub fn service(runtime: &Arc<FakeRuntime>, name: &str, config: ServiceConfig) -> LifecycleService {
    factory(runtime, DependencyIndex::new()).create(Box::new(FakeService::new(runtime, name, config)))
}

pub fn service_with_options(
    runtime: &Arc<FakeRuntime>,
    name: &str,
    config: ServiceConfig,
    options: LifecycleOptions,
) -> LifecycleService {
    factory(runtime, DependencyIndex::new())
        .with_options(options)
        .unwrap()
        .create(Box::new(FakeService::new(runtime, name, config)))
}

/// Configuration of a system service whose image is present.
pub fn system_config(runtime: &Arc<FakeRuntime>, image: &str) -> ServiceConfig {
    runtime.add_image(image);
    ServiceConfig::with_image(image).label(bosun::policy::labels::SCOPE, bosun::policy::labels::SYSTEM)
}
