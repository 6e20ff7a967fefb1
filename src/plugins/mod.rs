// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in components, registered lazily.
//!
//! | Namespace                   | Module             | Exports                        |
//! |-----------------------------|--------------------|--------------------------------|
//! | `vega.callbacks.predefined` | `early_stopping`   | `callback:EarlyStopping`       |
//! | `vega.callbacks.predefined` | `trainer_reporter` | `callback:TrainerReporter`     |
//! | `vega.estimators`           | `scheduled`        | `estimator:ScheduledEstimator` |

pub mod estimators;

use crate::callbacks::predefined::{EarlyStopping, TrainerReporter};
use crate::errors::ImportError;
use crate::registry::{
    Capability, Category, Implementation, Instance, Module, RegistryContext, StaticModules,
};

pub use estimators::{OptMode, ScheduledEstimator};

pub const CALLBACK_NAMESPACE: &str = "vega.callbacks.predefined";
pub const ESTIMATOR_NAMESPACE: &str = "vega.estimators";

/// Module table backing the built-in lazy registrations.
pub fn builtin_modules() -> StaticModules {
    StaticModules::new()
        .with("vega.callbacks.predefined.early_stopping", early_stopping_module)
        .with("vega.callbacks.predefined.trainer_reporter", trainer_reporter_module)
        .with("vega.estimators.scheduled", scheduled_module)
}

/// Declare the built-in modules in `ctx`. Nothing is loaded until first use.
pub fn register_builtins(ctx: &RegistryContext) {
    ctx.lazy_register(
        CALLBACK_NAMESPACE,
        [
            ("early_stopping", vec!["callback:EarlyStopping"]),
            ("trainer_reporter", vec!["callback:TrainerReporter"]),
        ],
    );
    ctx.lazy_register(
        ESTIMATOR_NAMESPACE,
        [("scheduled", vec!["estimator:ScheduledEstimator"])],
    );
}

/// `(category, name)` of every built-in component.
pub fn list_available_implementations() -> Vec<(Category, &'static str)> {
    vec![
        (Category::CALLBACK, "EarlyStopping"),
        (Category::CALLBACK, "TrainerReporter"),
        (Category::ESTIMATOR, "ScheduledEstimator"),
    ]
}

fn early_stopping_module() -> Result<Module, ImportError> {
    Ok(Module::new("vega.callbacks.predefined.early_stopping").export(
        Category::CALLBACK,
        "EarlyStopping",
        Implementation::class(Capability::Callback, |params| {
            Ok(Instance::Callback(
                EarlyStopping::from_params(params)?.into_hook(),
            ))
        }),
    ))
}

fn trainer_reporter_module() -> Result<Module, ImportError> {
    Ok(Module::new("vega.callbacks.predefined.trainer_reporter").export(
        Category::CALLBACK,
        "TrainerReporter",
        Implementation::class(Capability::Callback, |params| {
            Ok(Instance::Callback(
                TrainerReporter::from_params(params)?.into_hook(),
            ))
        }),
    ))
}

fn scheduled_module() -> Result<Module, ImportError> {
    Ok(Module::new("vega.estimators.scheduled").export(
        Category::ESTIMATOR,
        "ScheduledEstimator",
        Implementation::class(Capability::Estimator, |params| {
            Ok(Instance::Estimator(Box::new(
                ScheduledEstimator::from_params(params)?,
            )))
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ModuleSource, Params};

    #[test]
    fn every_listed_implementation_resolves() {
        let ctx = RegistryContext::with_builtins();
        for (category, name) in list_available_implementations() {
            assert!(ctx.get(&category, name).is_ok(), "{}:{}", category, name);
        }
    }

    #[test]
    fn builtin_modules_match_registrations() {
        let modules = builtin_modules();
        let ctx = RegistryContext::with_builtins();
        for (namespace, name) in ctx.lazy().registered() {
            let path = format!("{}.{}", namespace, name);
            assert!(modules.load(&path).is_ok(), "{}", path);
        }
    }

    #[test]
    fn constructors_validate_params() {
        let ctx = RegistryContext::with_builtins();
        let err = ctx
            .create(
                &Category::CALLBACK,
                "EarlyStopping",
                Params::new().with("threshold", "soon"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            crate::errors::FactoryError::Construction { ref name, .. } if name == "EarlyStopping"
        ));
    }
}
