//! Loosen constraints on dependencies that injected repositories provide.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};
use crate::host::{Repository, RootPackage};
use crate::package::{Links, Stability};

/// Rewrite every declared dependency provided by `repositories` to `@dev`.
///
/// Only links that already exist in `require` or `require-dev` are touched;
/// each one gets the match-all constraint and a `dev` stability flag. All
/// three collections are rebuilt on copies and written back only once every
/// repository has been enumerated, so a failure leaves `package` untouched.
///
/// Returns the names of the rewritten packages.
pub fn force_dev<P>(repositories: &[Arc<dyn Repository>], package: &mut P) -> Result<Vec<String>>
where
    P: RootPackage + ?Sized,
{
    let mut provided = BTreeSet::new();
    for repository in repositories {
        let packages = repository
            .packages()
            .map_err(|source| Error::PackageEnumeration {
                repository: repository.name(),
                source,
            })?;
        provided.extend(packages);
    }

    let mut requires = package.requires();
    let mut dev_requires = package.dev_requires();
    let mut stability_flags = package.stability_flags();
    let mut rewritten = Vec::new();

    for name in &provided {
        let mut matched = false;
        for links in [&mut requires, &mut dev_requires] {
            matched |= rewrite(links, name);
        }

        if matched {
            debug!("Forcing {} to @dev", name);
            stability_flags.insert(name.clone(), Stability::Dev);
            rewritten.push(name.clone());
        }
    }

    package.set_requires(requires);
    package.set_dev_requires(dev_requires);
    package.set_stability_flags(stability_flags);

    Ok(rewritten)
}

fn rewrite(links: &mut Links, name: &str) -> bool {
    match links.get_mut(name) {
        Some(link) => {
            *link = link.to_dev();
            true
        }
        None => false,
    }
}
