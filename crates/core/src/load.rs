//! Load pipeline: root control file -> resolved [`Model`].
//!
//! Thin orchestrator over the pass modules:
//!
//! 1. discover the file tree (`pass1_tree`)
//! 2. assemble components in rank order (`pass2_assemble`)
//! 3. evaluate scenario/event logic (`pass3_logic`)
//! 4. substitute placeholders (`pass4_variables`)
//! 5. extract typed settings (`pass5_settings`)
//! 6. optionally check attachments (`pass6_check`)

use std::path::Path;

use tracing::{info, info_span};

use crate::ast::LogicType;
use crate::component::Components;
use crate::error::{Diagnostics, LoadError};
use crate::model::Model;
use crate::options::LoadOptions;
use crate::parts::PartFactory;
use crate::pass1_tree;
use crate::pass2_assemble;
use crate::pass3_logic;
use crate::pass4_variables;
use crate::pass5_settings::ControlSettings;
use crate::pass6_check;
use crate::raw_file::FileId;
use crate::scenario::ScenarioEventContext;
use crate::source::{FileSystemProvider, SourceProvider};

/// Load `root` from the filesystem.
pub fn load(root: &Path, options: &LoadOptions) -> Result<Model, LoadError> {
    load_with_provider(root, options, &FileSystemProvider)
}

/// Load `root` through `provider`. Fails only when the scenario string is
/// malformed or the root itself cannot be loaded; everything else ends up
/// in [`Model::diagnostics`].
pub fn load_with_provider(
    root: &Path,
    options: &LoadOptions,
    provider: &dyn SourceProvider,
) -> Result<Model, LoadError> {
    let span = info_span!("load", root = %root.display());
    let _guard = span.enter();

    // Rejected before any file is touched.
    let mut context = ScenarioEventContext::parse(&options.scenarios)?;

    // Pass 1: file tree
    let discovery = pass1_tree::discover(root, provider)?;
    let root = discovery.store.get(FileId::default()).path.clone();

    // Pass 2: components
    let mut assembly = pass2_assemble::assemble(&discovery.store, &PartFactory::new());
    apply_default_tokens(&mut context, &assembly.components);

    // Pass 3: logic
    let logic_warnings = pass3_logic::apply_logic(
        &mut assembly.components,
        &assembly.order,
        &discovery.store,
        &context,
    );
    let files = discovery.store.into_file_infos();
    let mut components = assembly.components;

    // Pass 4: placeholders
    let resolution = pass4_variables::resolve_variables(&mut components, &context, &options.variables);

    // Pass 5: settings
    let (settings, setting_warnings) = ControlSettings::from_component(&components.control_2d);

    // Pass 6: attachments
    let check_warnings = if options.check_files {
        pass6_check::check_attachments(&components, provider)
    } else {
        Vec::new()
    };

    let mut warnings = assembly.warnings;
    warnings.extend(logic_warnings);
    warnings.extend(setting_warnings);
    warnings.extend(check_warnings);
    let diagnostics = Diagnostics {
        load_errors: discovery.load_errors,
        unresolved: resolution.unresolved,
        warnings,
    };

    info!(
        files = files.len(),
        parts = components.part_count(),
        diagnostics = diagnostics.len(),
        "load complete"
    );
    Ok(Model {
        root,
        files,
        components,
        context,
        variables: resolution.variables,
        settings,
        diagnostics,
    })
}

/// Fill namespaces the caller left empty from `Model Scenarios` /
/// `Model Events`.
fn apply_default_tokens(context: &mut ScenarioEventContext, components: &Components) {
    for (namespace, command) in [
        (LogicType::Scenario, "model scenarios"),
        (LogicType::Event, "model events"),
    ] {
        if context.has(namespace) {
            continue;
        }
        if let Some(part) = components.control_2d.last(command) {
            context.set_from_list(namespace, &part.values());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LoadErrorKind, Warning};
    use crate::source::InMemoryProvider;
    use std::path::PathBuf;

    fn provider() -> InMemoryProvider {
        InMemoryProvider::default()
            .with_file(
                "/m/runs/m.tcf",
                "\
Model Scenarios == BAS | 5m
Geometry Control File == ../model/g.tgc
If Scenario == DEV
BC Control File == ../model/dev.tbc
Else
BC Control File == ../model/bas.tbc
End If
Cell Size == ~s2~
",
            )
            .with_file("/m/model/g.tgc", "Read GIS Code == ../gis/code_<<~s1~>>.shp\n")
            .with_file("/m/model/bas.tbc", "BC Database == bc_dbase.csv\n")
    }

    #[test]
    fn model_scenarios_are_the_default() {
        let model =
            load_with_provider(Path::new("/m/runs/m.tcf"), &LoadOptions::new(), &provider()).unwrap();
        assert_eq!(model.context.to_string(), "s1 BAS s2 5m");
        assert_eq!(model.settings.cell_size, None);
        // references are followed whatever the scenario
        assert_eq!(model.diagnostics.load_errors.len(), 1);
        assert_eq!(
            model.diagnostics.load_errors[0].path,
            PathBuf::from("/m/model/dev.tbc")
        );
        let gis = model.components.geometry.last("read gis code").unwrap();
        assert_eq!(gis.files[0].path, PathBuf::from("/m/gis/code_BAS.shp"));
        // cell size "5m" does not parse
        assert!(matches!(
            &model.diagnostics.warnings[..],
            [Warning::InvalidSetting { .. }]
        ));
        assert!(model.is_partial());
    }

    #[test]
    fn caller_scenarios_replace_defaults_and_select_branches() {
        let options = LoadOptions::new().with_scenarios("s1 DEV s2 2");
        let model = load_with_provider(Path::new("/m/runs/m.tcf"), &options, &provider()).unwrap();
        assert_eq!(model.settings.cell_size, Some(2.0));
        assert_eq!(model.diagnostics.load_errors.len(), 1);
        assert_eq!(model.diagnostics.load_errors[0].kind, LoadErrorKind::Missing);
        // bas.tbc was loaded but sits in the branch not taken
        assert_eq!(model.components.boundary.len(), 1);
        assert_eq!(model.components.boundary.active_parts().count(), 0);
    }

    #[test]
    fn malformed_scenario_string_fails_before_loading() {
        let options = LoadOptions::new().with_scenarios("s1");
        let err = load_with_provider(Path::new("/nowhere.tcf"), &options, &provider()).unwrap_err();
        assert!(matches!(err, LoadError::Scenario(_)));
    }

    #[test]
    fn check_files_reports_missing_attachments() {
        let options = LoadOptions::new().with_check_files(true);
        let model = load_with_provider(Path::new("/m/runs/m.tcf"), &options, &provider()).unwrap();
        let missing: Vec<_> = model
            .diagnostics
            .warnings
            .iter()
            .filter(|w| matches!(w, Warning::MissingAttachment { .. }))
            .collect();
        assert_eq!(missing.len(), 2);
    }
}
