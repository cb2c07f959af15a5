//! Duplicate declaration detection
#[path = "../common.rs"]
mod common;
use common::{check_should_fail_with, check_should_pass};

const DUP: &str = "is already declared";

// Global scope
#[test] fn duplicate_class_same_module() { check_should_fail_with(r#"modules=["A"]
file=[{module="A",class=[{name="D"},{name="D"}]}]"#, "class `D` is already declared"); }
#[test] fn duplicate_class_across_modules() { check_should_fail_with(r#"modules=["A","B"]
file=[{module="A",class=[{name="D"}]},{module="B",class=[{name="D"}]}]"#, DUP); }
#[test] fn class_and_trait_share_scope() { check_should_fail_with(r#"modules=["A"]
file=[{module="A",class=[{name="D"}],trait=[{name="D"}]}]"#, "trait `D` is already declared"); }
#[test] fn class_and_function_share_scope() { check_should_fail_with(r#"modules=["A"]
file=[{module="A",class=[{name="main"}],function=[{name="main"}]}]"#, "function `main` is already declared"); }
#[test] fn duplicate_across_files() { check_should_fail_with(r#"modules=["A"]
file=[{path="x.php",module="A",function=[{name="f"}]},{path="y.php",module="A",function=[{name="f"}]}]"#, DUP); }

// Member scope
#[test] fn duplicate_method_in_class() { check_should_fail_with(r#"modules=["A"]
file=[{module="A",class=[{name="D",method=[{name="foo"},{name="foo",visibility="internal"}]}]}]"#, "method `D::foo` is already declared"); }
#[test] fn duplicate_method_in_trait() { check_should_fail_with(r#"modules=["A"]
file=[{module="A",trait=[{name="T",method=[{name="m"},{name="m"}]}]}]"#, "method `T::m` is already declared"); }
#[test] fn same_method_name_in_two_classes() { check_should_pass(r#"modules=["A"]
file=[{module="A",class=[{name="D",method=[{name="foo"}]},{name="E",method=[{name="foo"}]}]}]"#); }
#[test] fn method_named_like_class() { check_should_pass(r#"modules=["A"]
file=[{module="A",class=[{name="D",method=[{name="D"}]}]}]"#); }

// Modules and entry points
#[test] fn duplicate_module() { check_should_fail_with(r#"modules=["A","A"]"#, "module `A` is already declared"); }
#[test] fn default_module_is_reserved() { check_should_fail_with(r#"modules=["default"]"#, "module `default` is already declared"); }
#[test] fn two_entry_points() { check_should_fail_with(r#"modules=["A"]
file=[{module="A",function=[{name="a",entry_point=true},{name="b",entry_point=true}]}]"#, "entry point `b` is already declared"); }
#[test] fn one_entry_point() { check_should_pass(r#"modules=["A"]
file=[{module="A",function=[{name="a",entry_point=true},{name="b",entry_point=false}]}]"#); }
