//! Method classifier: partitions a suite's methods by lifecycle role.

use crate::engine::factory::SuiteInstance;
use crate::suite::{MethodInfo, Receiver, Visibility};
use crate::tags::Role;

/// The role-partitioned methods of one suite, each in declaration order.
#[derive(Debug, Default)]
pub struct MethodSets<'a> {
    pub setups: Vec<&'a MethodInfo>,
    pub teardowns: Vec<&'a MethodInfo>,
    pub tests: Vec<&'a MethodInfo>,
}

impl<'a> MethodSets<'a> {
    pub fn role(&self, role: Role) -> &[&'a MethodInfo] {
        match role {
            Role::Setup => &self.setups,
            Role::Teardown => &self.teardowns,
            Role::Test => &self.tests,
        }
    }
}

/// Whether the engine looks at `method` at all: public instance methods only.
pub fn is_examined(method: &MethodInfo) -> bool {
    method.visibility() == Visibility::Public && method.receiver() == Receiver::Instance
}

/// Partition the examined methods of `instance`'s type into setups, teardowns and tests.
///
/// Each role is checked independently, so a method tagged with two roles lands in both sequences
/// and a method with no role tag lands in none.
pub fn classify<'a>(instance: &SuiteInstance<'a>) -> MethodSets<'a> {
    let examined: Vec<&'a MethodInfo> = instance.suite().methods().iter().filter(|m| is_examined(m)).collect();
    let with_role = |role: Role| examined.iter().copied().filter(|m| m.has_role(role)).collect::<Vec<_>>();

    MethodSets {
        setups: with_role(Role::Setup),
        teardowns: with_role(Role::Teardown),
        tests: with_role(Role::Test),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::factory::construct;
    use crate::failure::MethodResult;
    use crate::suite::{Method, SuiteType};
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct Boom;

    #[derive(Default)]
    struct Shapes;

    fn ok(_: &mut Shapes) -> MethodResult {
        Ok(())
    }

    fn names(methods: &[&MethodInfo]) -> Vec<&'static str> {
        methods.iter().map(|m| m.name()).collect()
    }

    #[test]
    fn test_partitions_by_role_in_declaration_order() {
        let suite = SuiteType::builder::<Shapes>("tests::Shapes")
            .suite()
            .default_constructor()
            .method(Method::new("z_test", ok).test())
            .method(Method::new("cleanup", ok).teardown())
            .method(Method::new("init", ok).setup())
            .method(Method::new("a_test", ok).test().expects::<Boom>())
            .method(Method::new("untagged", ok))
            .build();
        let instance = construct(&suite).unwrap();
        let sets = classify(&instance);

        assert_eq!(names(&sets.setups), vec!["init"]);
        assert_eq!(names(&sets.tests), vec!["z_test", "a_test"]);
        assert_eq!(names(&sets.teardowns), vec!["cleanup"]);
        assert_eq!(names(sets.role(Role::Test)), vec!["z_test", "a_test"]);
    }

    #[test]
    fn test_private_and_associated_methods_are_invisible() {
        let suite = SuiteType::builder::<Shapes>("tests::Shapes")
            .suite()
            .default_constructor()
            .method(Method::new("hidden", ok).test().private())
            .method(Method::associated("static_test", || Ok(())).test())
            .method(Method::new("visible", ok).test())
            .build();
        let instance = construct(&suite).unwrap();
        assert_eq!(names(&classify(&instance).tests), vec!["visible"]);
    }

    #[test]
    fn test_multi_role_method_appears_in_each_role() {
        let suite = SuiteType::builder::<Shapes>("tests::Shapes")
            .suite()
            .default_constructor()
            .method(Method::new("both", ok).setup().test())
            .build();
        let instance = construct(&suite).unwrap();
        let sets = classify(&instance);
        assert_eq!(names(&sets.setups), vec!["both"]);
        assert_eq!(names(&sets.tests), vec!["both"]);
        assert!(sets.teardowns.is_empty());
    }
}
