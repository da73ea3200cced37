use crate::engine::core::rollup::TopN;
use crate::test_helpers::factory::Factory;

#[test]
fn test_plan_factory() {
    let plan = Factory::plan().with_top_n(TopN::Limit(3)).create();

    assert_eq!(plan.name, "test-plan");
    assert_eq!(plan.dimensions.len(), 1);
    assert_eq!(plan.resolve_top_n(5), Some(3));
}
