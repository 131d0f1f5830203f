//! Command registry
//!
//! Declares the module's type vocabulary and builds the descriptor for each
//! exposed command: `list`, `create`, `insertOne`, `findOneEquals`, and
//! `find`. The descriptors are assembled once at startup into a
//! [`ModuleRegistration`] and handed to the dispatcher; registration itself
//! cannot fail, and nothing is mutated afterwards.

pub mod collections;
mod context;

pub use context::ConnectorContext;

use crate::dispatch::{CommandDescriptor, Method, ModuleRegistration, TypeDecl, create_handler};

/// Name the dispatcher mounts this module under.
pub const MODULE_NAME: &str = "collections";

/// Build the full registration payload for this module.
///
/// # Arguments
/// * `context` - Connector context captured by every handler
///
/// # Returns
/// * `ModuleRegistration` - Type vocabulary plus all command descriptors
pub fn register(context: &ConnectorContext) -> ModuleRegistration {
    ModuleRegistration {
        name: MODULE_NAME,
        types: vec![
            TypeDecl {
                name: "collections",
                definition: "list<collection>",
            },
            TypeDecl {
                name: "document",
                definition: "map",
            },
        ],
        commands: vec![
            list_command(context),
            create_command(context),
            insert_one_command(context),
            find_one_equals_command(context),
            find_command(context),
        ],
    }
}

fn list_command(context: &ConnectorContext) -> CommandDescriptor {
    let context = context.clone();
    CommandDescriptor {
        name: "list",
        title: "returns all of the collections in a db",
        returns: "collections",
        syntax: &["list collections", "list collections in (dbname string)"],
        method: Method::Get,
        endpoint: "{dbname}/collections",
        handler: create_handler(move |request| collections::list(context.clone(), request)),
    }
}

fn create_command(context: &ConnectorContext) -> CommandDescriptor {
    let context = context.clone();
    CommandDescriptor {
        name: "create",
        title: "creates a new collection",
        returns: "collection",
        syntax: &[
            "create collection (collectionName string)",
            "create collection (collectionName string) in (dbname string)",
        ],
        method: Method::Get,
        endpoint: "{dbname}/collections/create/{collectionName}",
        handler: create_handler(move |request| collections::create(context.clone(), request)),
    }
}

fn insert_one_command(context: &ConnectorContext) -> CommandDescriptor {
    let context = context.clone();
    CommandDescriptor {
        name: "insertOne",
        title: "inserts a document",
        returns: "map",
        syntax: &[
            "insert (doc map) into collection (collectionName string)",
            "insert (doc map) into collection (collectionName string) in (dbname string)",
        ],
        method: Method::Post,
        endpoint: "{dbname}/collection/{collectionName}/insert-one",
        handler: create_handler(move |request| collections::insert_one(context.clone(), request)),
    }
}

fn find_one_equals_command(context: &ConnectorContext) -> CommandDescriptor {
    let context = context.clone();
    CommandDescriptor {
        name: "findOneEquals",
        title: "finds a document filtered by a single field",
        returns: "document",
        syntax: &[
            "find one in collection (collectionName string) where (field string) is (value string)",
            "find one in collection (collectionName string) in (dbname string) where (field string) is (value string)",
        ],
        method: Method::Post,
        endpoint: "{dbname}/collection/{collectionName}/findOneEquals/{field}/is/{value}",
        handler: create_handler(move |request| {
            collections::find_one_equals(context.clone(), request)
        }),
    }
}

fn find_command(context: &ConnectorContext) -> CommandDescriptor {
    let context = context.clone();
    CommandDescriptor {
        name: "find",
        title: "finds documents with a query",
        returns: "list<document>",
        syntax: &[
            "find in collection (collectionName string) where (query map)",
            "find in collection (collectionName string) in (dbname string) where (query map)",
        ],
        method: Method::Post,
        endpoint: "{dbname}/collection/{collectionName}/find/{query}",
        handler: create_handler(move |request| collections::find(context.clone(), request)),
    }
}
