//! Internal member access across modules
#[path = "../common.rs"]
mod common;
use common::{check_should_fail_with, check_should_pass};

const CROSS: &str = "cannot access internal member";

// Same module
#[test] fn internal_method_same_module() { check_should_pass(r#"modules=["A"]
file=[{module="A",class=[{name="D",method=[{name="foo",visibility="internal"}]},{name="E",method=[{name="bar",calls=["D::foo"]}]}]}]"#); }
#[test] fn internal_function_same_module() { check_should_pass(r#"modules=["A"]
file=[{module="A",function=[{name="helper",visibility="internal"},{name="main",calls=["helper"]}]}]"#); }
#[test] fn same_module_across_files() { check_should_pass(r#"modules=["A"]
file=[{path="a1.php",module="A",class=[{name="D",method=[{name="foo",visibility="internal"}]}]},{path="a2.php",module="A",function=[{name="f",calls=["D::foo"]}]}]"#); }
#[test] fn self_call_to_internal() { check_should_pass(r#"modules=["A"]
file=[{module="A",class=[{name="D",method=[{name="foo",visibility="internal",calls=["D::foo"]}]}]}]"#); }

// Public targets
#[test] fn public_method_cross_module() { check_should_pass(r#"modules=["A","B"]
file=[{module="A",class=[{name="D",method=[{name="foo"}]}]},{module="B",function=[{name="f",calls=["D::foo"]}]}]"#); }
#[test] fn explicit_public_cross_module() { check_should_pass(r#"modules=["A","B"]
file=[{module="A",class=[{name="D",method=[{name="foo",visibility="public"}]}]},{module="B",function=[{name="f",calls=["D::foo"]}]}]"#); }
#[test] fn public_class_construction_cross_module() { check_should_pass(r#"modules=["A","B"]
file=[{module="A",class=[{name="D"}]},{module="B",function=[{name="f",calls=["D"]}]}]"#); }

// Cross-module internal access
#[test] fn internal_method_from_other_module_class() { check_should_fail_with(r#"modules=["A","B"]
file=[{module="A",class=[{name="D",method=[{name="foo",visibility="internal"}]}]},{module="B",class=[{name="C",method=[{name="bar",calls=["D::foo"]}]}]}]"#, CROSS); }
#[test] fn internal_method_from_other_module_function() { check_should_fail_with(r#"modules=["A","B"]
file=[{module="A",class=[{name="D",method=[{name="foo",visibility="internal"}]}]},{module="B",function=[{name="f",calls=["D::foo"]}]}]"#, "of module `A` from module `B`"); }
#[test] fn internal_function_from_other_module() { check_should_fail_with(r#"modules=["A","B"]
file=[{module="A",function=[{name="helper",visibility="internal"}]},{module="B",function=[{name="main",calls=["helper"]}]}]"#, "internal member `helper`"); }
#[test] fn internal_class_construction_cross_module() { check_should_fail_with(r#"modules=["A","B"]
file=[{module="A",class=[{name="D",visibility="internal"}]},{module="B",function=[{name="f",calls=["D"]}]}]"#, "internal member `D`"); }
#[test] fn internal_from_default_module() { check_should_fail_with(r#"modules=["A"]
file=[{module="A",class=[{name="D",method=[{name="foo",visibility="internal"}]}]},{function=[{name="f",calls=["D::foo"]}]}]"#, "from module `default`"); }
#[test] fn internal_into_default_module_from_named() { check_should_fail_with(r#"modules=["A"]
file=[{function=[{name="helper",visibility="internal"}]},{module="A",function=[{name="f",calls=["helper"]}]}]"#, "of module `default` from module `A`"); }

// Method inherited through an ordinary trait keeps the trait's module as target module
#[test] fn internal_trait_method_through_class() { check_should_fail_with(r#"modules=["A","B"]
file=[{module="A",trait=[{name="U",method=[{name="m",visibility="internal"}]}],class=[{name="D",uses=["U"]}]},{module="B",function=[{name="f",calls=["D::m"]}]}]"#, "internal member `m` of module `A`"); }

// Every rejection is reported, not only the first
#[test]
fn all_rejections_are_collected() {
    let report = modvis::check_source(r#"modules=["A","B"]
file=[{module="A",class=[{name="D",method=[{name="foo",visibility="internal"},{name="baz",visibility="internal"}]}]},{module="B",function=[{name="f",calls=["D::foo","D::baz"]},{name="g",calls=["D::foo"]}]}]"#).unwrap();
    assert_eq!(report.checked, 3);
    assert_eq!(report.rejections.len(), 3);
    let names: Vec<_> = report.rejections.iter().map(|r| r.target_name.as_str()).collect();
    assert_eq!(names, vec!["foo", "baz", "foo"]);
}
