//! Phase 3: decorator retention.
//!
//! Frameworks load decorated classes, methods and properties through
//! dependency injection, routing tables or schema reflection, so static
//! reachability cannot see them. Symbols whose decorators intersect the
//! retention set are marked retained (and used).

use std::collections::BTreeSet;

use anyhow::Result;

use super::{Mutator, MutatorContext, Phase};
use crate::frameworks::retention_decorators;

pub struct DecoratorRetainer;

/// Package name -> decorators commonly denoting framework-managed code.
/// Checked against the manifest so that undetected frameworks (anything
/// without a full detector) still retain their decorated code.
const DECORATOR_TABLE: &[(&str, &[&str])] = &[
    (
        "typeorm",
        &[
            "Entity",
            "Column",
            "PrimaryColumn",
            "PrimaryGeneratedColumn",
            "OneToMany",
            "ManyToOne",
            "ManyToMany",
            "JoinColumn",
            "JoinTable",
        ],
    ),
    (
        "class-validator",
        &["IsString", "IsNumber", "IsBoolean", "IsOptional", "IsEmail", "ValidateNested"],
    ),
    ("mobx", &["observable", "action", "computed", "observer"]),
    (
        "@angular/core",
        &[
            "Component",
            "Directive",
            "Injectable",
            "NgModule",
            "Pipe",
            "Input",
            "Output",
            "HostListener",
        ],
    ),
    ("inversify", &["injectable", "inject"]),
];

impl Mutator for DecoratorRetainer {
    fn name(&self) -> &'static str {
        "decorator-retainer"
    }

    fn phase(&self) -> Phase {
        Phase::Retention
    }

    fn run(&self, ctx: &mut MutatorContext<'_>) -> Result<()> {
        let retain_all = ctx.config.retain_all_decorated;

        // Active set: framework detectors' contributions, the static table
        // for packages present in the manifest, and the user-supplied names.
        let mut active: BTreeSet<String> = retention_decorators(ctx.frameworks);
        if let Some(manifest) = ctx.manifest {
            for (package, decorators) in DECORATOR_TABLE {
                if manifest.is_listed(package) {
                    active.extend(decorators.iter().map(|d| d.to_string()));
                }
            }
        }
        active.extend(ctx.config.retain_decorators.iter().cloned());

        if active.is_empty() && !retain_all {
            return Ok(());
        }

        for id in ctx.graph.sorted_ids() {
            let Some(node) = ctx.graph.node(&id) else {
                continue;
            };
            if node.decorators.is_empty() {
                continue;
            }
            let matched = node
                .decorators
                .iter()
                .find(|d| active.contains(d.as_str()))
                .cloned();
            let reason = match (&matched, retain_all) {
                (Some(decorator), _) => format!("decorated with @{}", decorator),
                (None, true) => format!("decorated with @{}", node.decorators[0]),
                (None, false) => continue,
            };
            ctx.mark_retained(&id, reason);
        }
        Ok(())
    }
}
