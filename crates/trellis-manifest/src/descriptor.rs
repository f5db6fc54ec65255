use crate::bindings::TriggerBinding;
use crate::listener::EventListener;
use crate::meta::ObjectMeta;
use crate::route::Route;
use crate::secret::Secret;
use crate::task::Task;
use crate::types::ResourceName;
use crate::ManifestError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ManifestKind {
    Secret,
    TriggerBinding,
    Task,
    EventListener,
    Route,
}

impl ManifestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Secret => "Secret",
            Self::TriggerBinding => "TriggerBinding",
            Self::Task => "Task",
            Self::EventListener => "EventListener",
            Self::Route => "Route",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resource of an assembled output set.
///
/// Serializes as the wrapped resource, without any enum tagging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ManifestDescriptor {
    Secret(Secret),
    TriggerBinding(TriggerBinding),
    Task(Task),
    EventListener(EventListener),
    Route(Route),
}

impl ManifestDescriptor {
    pub fn kind(&self) -> ManifestKind {
        match self {
            Self::Secret(_) => ManifestKind::Secret,
            Self::TriggerBinding(_) => ManifestKind::TriggerBinding,
            Self::Task(_) => ManifestKind::Task,
            Self::EventListener(_) => ManifestKind::EventListener,
            Self::Route(_) => ManifestKind::Route,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::Secret(r) => &r.metadata,
            Self::TriggerBinding(r) => &r.metadata,
            Self::Task(r) => &r.metadata,
            Self::EventListener(r) => &r.metadata,
            Self::Route(r) => &r.metadata,
        }
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        match self {
            Self::Secret(r) => &mut r.metadata,
            Self::TriggerBinding(r) => &mut r.metadata,
            Self::Task(r) => &mut r.metadata,
            Self::EventListener(r) => &mut r.metadata,
            Self::Route(r) => &mut r.metadata,
        }
    }

    pub fn name(&self) -> &ResourceName {
        &self.metadata().name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata().namespace.as_deref()
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.metadata_mut().namespace = Some(namespace.to_owned());
        self
    }

    /// Check the structural invariants a manifest must hold before rendering.
    pub fn check(&self) -> Result<(), ManifestError> {
        let name = self.name();
        if name.trim().is_empty() {
            return Err(ManifestError::EmptyName(self.kind()));
        }
        match self {
            Self::Secret(secret) => {
                if secret.data.is_empty() {
                    return Err(ManifestError::EmptySecretData(name.to_string()));
                }
            }
            Self::Task(task) => {
                let params = task.undeclared_params();
                if !params.is_empty() {
                    return Err(ManifestError::UndeclaredTaskParams {
                        task: name.to_string(),
                        params,
                    });
                }
            }
            Self::EventListener(listener) => {
                if listener.spec.triggers.is_empty() {
                    return Err(ManifestError::NoTriggers(name.to_string()));
                }
            }
            Self::Route(route) => {
                if route.spec.to.name.trim().is_empty() {
                    return Err(ManifestError::EmptyRouteTarget(name.to_string()));
                }
            }
            Self::TriggerBinding(_) => {}
        }
        Ok(())
    }
}

macro_rules! impl_from_resource {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ManifestDescriptor {
                fn from(resource: $variant) -> Self {
                    Self::$variant(resource)
                }
            }
        )*
    };
}

impl_from_resource!(Secret, TriggerBinding, Task, EventListener, Route);

/// Ordered, name-unique collection produced by one assembly run.
///
/// The order is the emission order; there is no way to mutate a set once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSet {
    manifests: Vec<ManifestDescriptor>,
}

impl ManifestSet {
    pub fn new(manifests: Vec<ManifestDescriptor>) -> Result<Self, ManifestError> {
        let mut seen = BTreeSet::new();
        for m in &manifests {
            if !seen.insert(m.name().as_str()) {
                return Err(ManifestError::DuplicateName(m.name().to_string()));
            }
        }
        Ok(Self { manifests })
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestDescriptor> {
        self.manifests.iter()
    }

    pub fn kinds(&self) -> Vec<ManifestKind> {
        self.manifests.iter().map(ManifestDescriptor::kind).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.manifests.iter().map(|m| m.name().as_str()).collect()
    }
}

impl IntoIterator for ManifestSet {
    type Item = ManifestDescriptor;
    type IntoIter = std::vec::IntoIter<ManifestDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.manifests.into_iter()
    }
}

impl<'a> IntoIterator for &'a ManifestSet {
    type Item = &'a ManifestDescriptor;
    type IntoIter = std::slice::Iter<'a, ManifestDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.manifests.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::binding_catalog;
    use crate::listener::event_listener;
    use crate::route::route_for;
    use crate::task::deploy_from_source_task;

    #[test]
    fn kind_and_name_follow_variant() {
        let m = ManifestDescriptor::from(Secret::opaque("github-auth", b"t".to_vec()));
        assert_eq!(m.kind(), ManifestKind::Secret);
        assert_eq!(m.name(), &ResourceName::new("github-auth"));
        assert!(m.namespace().is_none());
    }

    #[test]
    fn with_namespace_sets_metadata() {
        let m = ManifestDescriptor::from(deploy_from_source_task()).with_namespace("cicd");
        assert_eq!(m.namespace(), Some("cicd"));
    }

    #[test]
    fn untagged_serialization_matches_resource() {
        let task = deploy_from_source_task();
        let direct = serde_json::to_value(&task).unwrap();
        let wrapped = serde_json::to_value(ManifestDescriptor::from(task)).unwrap();
        assert_eq!(direct, wrapped);
        assert_eq!(wrapped["kind"], "Task");
        assert_eq!(wrapped["apiVersion"], "tekton.dev/v1alpha1");
    }

    #[test]
    fn set_rejects_duplicate_names() {
        let a = ManifestDescriptor::from(Secret::opaque("dup", b"a".to_vec()));
        let b = ManifestDescriptor::from(Secret::docker_config("dup", b"{}".to_vec()));
        let err = ManifestSet::new(vec![a, b]).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateName(ref n) if n == "dup"));
    }

    #[test]
    fn set_preserves_order() {
        let listener = event_listener("org/repo");
        let route = route_for(&listener);
        let mut items: Vec<ManifestDescriptor> =
            binding_catalog().into_iter().map(Into::into).collect();
        items.push(listener.into());
        items.push(route.into());
        let set = ManifestSet::new(items).unwrap();
        assert_eq!(set.len(), 6);
        assert_eq!(
            set.kinds(),
            vec![
                ManifestKind::TriggerBinding,
                ManifestKind::TriggerBinding,
                ManifestKind::TriggerBinding,
                ManifestKind::TriggerBinding,
                ManifestKind::EventListener,
                ManifestKind::Route,
            ]
        );
        assert_eq!(set.names()[4], "cicd-event-listener");
    }

    #[test]
    fn builders_produce_well_formed_manifests() {
        let listener = event_listener("org/repo");
        let route = route_for(&listener);
        let all: Vec<ManifestDescriptor> = vec![
            Secret::opaque("github-auth", b"t".to_vec()).into(),
            deploy_from_source_task().into(),
            listener.into(),
            route.into(),
        ];
        for m in &all {
            assert!(m.check().is_ok(), "{} should be well-formed", m.name());
        }
    }

    #[test]
    fn check_rejects_malformed_payloads() {
        let mut secret = Secret::opaque("empty", Vec::new());
        secret.data.clear();
        assert!(matches!(
            ManifestDescriptor::from(secret).check(),
            Err(ManifestError::EmptySecretData(_))
        ));

        let mut task = deploy_from_source_task();
        task.spec.inputs.params.clear();
        assert!(matches!(
            ManifestDescriptor::from(task).check(),
            Err(ManifestError::UndeclaredTaskParams { .. })
        ));

        let mut listener = event_listener("org/repo");
        listener.spec.triggers.clear();
        assert!(matches!(
            ManifestDescriptor::from(listener).check(),
            Err(ManifestError::NoTriggers(_))
        ));

        let unnamed = Secret::opaque(" ", b"x".to_vec());
        assert!(matches!(
            ManifestDescriptor::from(unnamed).check(),
            Err(ManifestError::EmptyName(ManifestKind::Secret))
        ));
    }
}
