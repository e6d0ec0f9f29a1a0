//! Sample components and the demo registry written by `engine_inspect demo`.

use bytemuck::{Pod, Zeroable};

use engine_component::{Component, ComponentKindId};
use engine_registry::{Registry, RegistryError};

/// Planar position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
}

impl Component for Transform {
    fn type_name() -> &'static str {
        "Transform"
    }
}

/// Three-float payload used to exercise multi-kind entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Test {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl Component for Test {
    fn type_name() -> &'static str {
        "Test"
    }
}

/// Type name for the sample kinds, which snapshots do not carry.
pub fn known_name(kind: ComponentKindId) -> Option<&'static str> {
    [
        (Transform::kind_id(), Transform::type_name()),
        (Test::kind_id(), Test::type_name()),
    ]
    .into_iter()
    .find_map(|(id, name)| (id == kind).then_some(name))
}

/// Build `count` entities, each with a `Transform`; every other one also
/// gets a `Test`.
pub fn build(count: u32) -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    for i in 0..count {
        let entity = registry.create_entity();
        let step = i as f32;
        *registry.add_component::<Transform>(entity)? = Transform {
            x: step,
            y: step * 2.0,
        };
        if i % 2 == 1 {
            *registry.add_component::<Test>(entity)? = Test {
                a: step,
                b: step + 0.5,
                c: -step,
            };
        }
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_attaches_test_to_odd_entities() {
        let mut registry = build(4).unwrap();
        assert_eq!(registry.entity_count(), 4);
        assert_eq!(registry.pool_len(Transform::kind_id()), 4);
        assert_eq!(registry.pool_len(Test::kind_id()), 2);

        let second = registry.entities()[1];
        assert_eq!(registry.get_component::<Test>(second).unwrap().b, 1.5);
    }

    #[test]
    fn test_known_name() {
        assert_eq!(known_name(Transform::kind_id()), Some("Transform"));
        assert_eq!(known_name(Test::kind_id()), Some("Test"));
        assert_eq!(known_name(ComponentKindId::from_name("Velocity")), None);
    }
}
