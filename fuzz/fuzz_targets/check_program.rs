#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

const MODULES: [&str; 3] = ["A", "B", "C"];
const TYPES: [&str; 4] = ["D", "E", "T", "U"];

/// Small structured program: a fixed pool of names keeps most inputs past
/// name resolution so the visibility check itself gets exercised.
#[derive(Arbitrary, Debug)]
struct FuzzType {
    module: u8,
    name: u8,
    is_trait: bool,
    module_level: bool,
    internal: bool,
    uses: Vec<u8>,
    calls: Vec<u8>,
}

#[derive(Arbitrary, Debug)]
struct FuzzProgram {
    types: Vec<FuzzType>,
}

impl FuzzProgram {
    fn to_manifest(&self) -> String {
        let mut source = String::from("modules = [\"A\", \"B\", \"C\"]\n");
        for ty in self.types.iter().take(8) {
            let module = MODULES[ty.module as usize % MODULES.len()];
            let name = TYPES[ty.name as usize % TYPES.len()];
            let section = if ty.is_trait { "trait" } else { "class" };
            let pick = |ids: &[u8]| {
                ids.iter()
                    .take(4)
                    .map(|i| format!("\"{}\"", TYPES[*i as usize % TYPES.len()]))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let calls = ty
                .calls
                .iter()
                .take(4)
                .map(|i| format!("\"{}::m\"", TYPES[*i as usize % TYPES.len()]))
                .collect::<Vec<_>>()
                .join(", ");
            source.push_str(&format!(
                "\n[[file]]\nmodule = \"{module}\"\nunstable_features = [\"module_level_traits\"]\n\
                 [[file.{section}]]\nname = \"{name}\"\nmodule_level = {}\nuses = [{}]\n\
                 [[file.{section}.method]]\nname = \"m\"\nvisibility = \"{}\"\ncalls = [{calls}]\n",
                ty.is_trait && ty.module_level,
                pick(&ty.uses),
                if ty.internal { "internal" } else { "public" },
            ));
        }
        source
    }
}

fuzz_target!(|input: FuzzProgram| {
    let source = input.to_manifest();
    if let Ok(program) = modvis::load_program(&source) {
        let first = modvis::typeck::check_program(&program);
        let second = modvis::typeck::check_program(&program);
        // Checking is a pure function of the program.
        assert_eq!(first, second);
    }
});
