//! Query commands, generic over the store they read from.

use std::io::Write;

use tiledbsc_core::uri::normalize;
use tiledbsc_core::{GroupStore, ObjectKind, Soma, SomaCollection, Visit, member_uris, walk};

const INDENT: &str = "  ";

/// Prints every SOMA of the collection at `uri`, each followed by its arrays.
pub fn walk_soco<S: GroupStore, W: Write>(store: &S, uri: &str, out: &mut W) -> anyhow::Result<()> {
    let soco = SomaCollection::open(store, uri);
    for (name, uri) in soco.list_somas()? {
        writeln!(out, "soma {} = {}", name, uri)?;
        for (name, uri) in Soma::open(store, uri).list_arrays()? {
            writeln!(out, "  array {} = {}", name, uri)?;
        }
    }
    Ok(())
}

pub fn arrays<S: GroupStore, W: Write>(store: &S, uri: &str, out: &mut W) -> anyhow::Result<()> {
    let soma = Soma::open(store, uri);
    for (name, uri) in soma.list_arrays()? {
        writeln!(out, "array {} = {}", name, uri)?;
    }
    Ok(())
}

pub fn somas<S: GroupStore, W: Write>(store: &S, uri: &str, out: &mut W) -> anyhow::Result<()> {
    let soco = SomaCollection::open(store, uri);
    for (name, uri) in soco.list_somas()? {
        writeln!(out, "soma {} = {}", name, uri)?;
    }
    Ok(())
}

/// Direct members of one group, without recursing.
pub fn ls<S: GroupStore, W: Write>(store: &S, uri: &str, out: &mut W) -> anyhow::Result<()> {
    for (name, uri) in member_uris(store, uri)? {
        writeln!(out, "{} = {}", name, uri)?;
    }
    Ok(())
}

/// The whole hierarchy under `uri`, one member per line, indented by depth.
pub fn tree<S: GroupStore, W: Write>(store: &S, uri: &str, out: &mut W) -> anyhow::Result<()> {
    let uri = normalize(uri);
    let root = store.open_group(&uri)?;
    let mut lines = Vec::new();

    // The walk path carries the indentation of the enclosing group.
    walk(store, &root, "", &mut |member, indent| {
        let indent = format!("{}{}", indent, INDENT);
        lines.push(format!(
            "{}{} ({}) {}",
            indent, member.name, member.kind, member.uri
        ));
        match member.kind {
            ObjectKind::Group => Ok(Visit::Enter {
                group: store.open_group(&member.uri)?,
                path: indent,
            }),
            ObjectKind::Array => Ok(Visit::Skip),
        }
    })?;

    writeln!(out, "{} ({})", uri, ObjectKind::Group)?;
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Kind of the object at `uri`.
pub fn stat<S: GroupStore, W: Write>(store: &S, uri: &str, out: &mut W) -> anyhow::Result<()> {
    match store.object_kind(uri)? {
        Some(kind) => writeln!(out, "{} = {}", normalize(uri), kind)?,
        None => anyhow::bail!("does not exist: {}", uri),
    }
    Ok(())
}
