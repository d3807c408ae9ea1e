//! Blog schema shared by tests across the crate

use super::raw;
use serde_json::{json, Value};

fn ty(name: &str, location: &str) -> Value {
    json!({ "type": name, "location": location, "isList": false })
}

fn list(name: &str, location: &str) -> Value {
    json!({ "type": name, "location": location, "isList": true })
}

fn model_ty(name: &str, is_list: bool) -> Value {
    json!({ "type": name, "location": "outputObjectTypes", "namespace": "model", "isList": is_list })
}

fn input(name: &str, required: bool, types: Vec<Value>) -> Value {
    json!({ "name": name, "isRequired": required, "isNullable": false, "inputTypes": types })
}

fn output(name: &str, nullable: bool, output_type: Value, args: Vec<Value>) -> Value {
    json!({ "name": name, "isNullable": nullable, "outputType": output_type, "args": args })
}

fn field(name: &str, kind: &str, ty: &str, extra: Value) -> Value {
    let mut value = json!({ "name": name, "kind": kind, "type": ty, "isList": false, "isRequired": true });
    if let (Some(target), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        target.extend(extra.clone());
    }
    value
}

fn find_many_args(model: &str) -> Vec<Value> {
    vec![
        input("where", false, vec![ty(&format!("{model}WhereInput"), "inputObjectTypes")]),
        input(
            "orderBy",
            false,
            vec![
                list(&format!("{model}OrderByWithRelationInput"), "inputObjectTypes"),
                ty(&format!("{model}OrderByWithRelationInput"), "inputObjectTypes"),
            ],
        ),
        input("take", false, vec![ty("Int", "scalar")]),
        input("skip", false, vec![ty("Int", "scalar")]),
    ]
}

fn input_object_types() -> Value {
    json!({
        "prisma": [
            { "name": "IntFilter", "fields": [
                input("equals", false, vec![ty("Int", "scalar"), ty("IntFieldRefInput", "fieldRefTypes")]),
                input("in", false, vec![list("Int", "scalar")]),
            ] },
            { "name": "StringFilter", "fields": [
                input("equals", false, vec![ty("String", "scalar")]),
                input("contains", false, vec![ty("String", "scalar")]),
            ] },
            { "name": "StringFieldUpdateOperationsInput", "fields": [
                input("set", false, vec![ty("String", "scalar")]),
            ] },
            { "name": "PostWhereInput", "fields": [
                input("AND", false, vec![ty("PostWhereInput", "inputObjectTypes"), list("PostWhereInput", "inputObjectTypes")]),
                input("id", false, vec![ty("IntFilter", "inputObjectTypes"), ty("Int", "scalar")]),
                input("title", false, vec![ty("StringFilter", "inputObjectTypes"), ty("String", "scalar")]),
            ] },
            { "name": "PostWhereUniqueInput", "fields": [
                input("id", false, vec![ty("Int", "scalar")]),
            ] },
            { "name": "PostOrderByWithRelationInput", "fields": [
                input("id", false, vec![ty("SortOrder", "enumTypes")]),
                input("title", false, vec![ty("SortOrder", "enumTypes")]),
            ] },
            { "name": "PostCreateInput", "fields": [
                input("title", true, vec![ty("String", "scalar")]),
                input("published", false, vec![ty("Boolean", "scalar")]),
                input("createdAt", false, vec![ty("DateTime", "scalar")]),
                input("author", true, vec![ty("UserCreateNestedOneWithoutPostsInput", "inputObjectTypes")]),
            ] },
            { "name": "PostUncheckedCreateInput", "fields": [
                input("title", true, vec![ty("String", "scalar")]),
                input("authorId", true, vec![ty("Int", "scalar")]),
            ] },
            { "name": "PostUpdateInput", "fields": [
                input("title", false, vec![ty("String", "scalar"), ty("StringFieldUpdateOperationsInput", "inputObjectTypes")]),
            ] },
            { "name": "UserWhereInput", "fields": [
                input("id", false, vec![ty("IntFilter", "inputObjectTypes"), ty("Int", "scalar")]),
                input("name", false, vec![ty("StringFilter", "inputObjectTypes"), ty("String", "scalar"), ty("Null", "scalar")]),
                input("password", false, vec![ty("StringFilter", "inputObjectTypes")]),
                {
                    "name": "nickname",
                    "isRequired": false,
                    "isNullable": true,
                    "inputTypes": [ty("String", "scalar")],
                    "deprecation": { "sinceVersion": "4.0.0", "reason": "use name" }
                },
            ] },
            { "name": "UserWhereUniqueInput", "fields": [
                input("id", false, vec![ty("Int", "scalar")]),
                input("email", false, vec![ty("String", "scalar")]),
            ] },
            { "name": "UserCreateInput", "fields": [
                input("email", true, vec![ty("String", "scalar")]),
                input("name", false, vec![ty("String", "scalar")]),
                input("password", true, vec![ty("String", "scalar")]),
                input("role", true, vec![ty("Role", "enumTypes")]),
            ] },
            { "name": "UserCreateNestedOneWithoutPostsInput", "fields": [
                input("connect", false, vec![ty("UserWhereUniqueInput", "inputObjectTypes")]),
            ] },
        ],
    })
}

fn output_object_types() -> Value {
    json!({
        "prisma": [
            { "name": "Query", "fields": [
                output("findUniquePost", true, model_ty("Post", false), vec![
                    input("where", true, vec![ty("PostWhereUniqueInput", "inputObjectTypes")]),
                ]),
                output("findManyPost", false, model_ty("Post", true), find_many_args("Post")),
                output("aggregatePost", false, ty("AggregatePost", "outputObjectTypes"), vec![
                    input("where", false, vec![ty("PostWhereInput", "inputObjectTypes")]),
                ]),
                output("findUniqueUser", true, model_ty("User", false), vec![
                    input("where", true, vec![ty("UserWhereUniqueInput", "inputObjectTypes")]),
                ]),
                output("findManyUser", false, model_ty("User", true), vec![
                    input("where", false, vec![ty("UserWhereInput", "inputObjectTypes")]),
                ]),
            ] },
            { "name": "Mutation", "fields": [
                output("createOnePost", false, model_ty("Post", false), vec![
                    input("data", true, vec![
                        ty("PostCreateInput", "inputObjectTypes"),
                        ty("PostUncheckedCreateInput", "inputObjectTypes"),
                    ]),
                ]),
                output("updateOnePost", true, model_ty("Post", false), vec![
                    input("data", true, vec![ty("PostUpdateInput", "inputObjectTypes")]),
                    input("where", true, vec![ty("PostWhereUniqueInput", "inputObjectTypes")]),
                ]),
                output("deleteManyPost", false, ty("AffectedRowsOutput", "outputObjectTypes"), vec![
                    input("where", false, vec![ty("PostWhereInput", "inputObjectTypes")]),
                ]),
                output("createOneUser", false, model_ty("User", false), vec![
                    input("data", true, vec![ty("UserCreateInput", "inputObjectTypes")]),
                ]),
            ] },
            { "name": "AggregatePost", "fields": [
                output("_count", true, ty("PostCountAggregateOutputType", "outputObjectTypes"), vec![]),
                output("_avg", true, ty("PostAvgAggregateOutputType", "outputObjectTypes"), vec![]),
            ] },
            { "name": "PostCountAggregateOutputType", "fields": [
                output("id", false, ty("Int", "scalar"), vec![]),
                output("_all", false, ty("Int", "scalar"), vec![]),
            ] },
            { "name": "PostAvgAggregateOutputType", "fields": [
                output("id", true, ty("Float", "scalar"), vec![]),
            ] },
            { "name": "AffectedRowsOutput", "fields": [
                output("count", false, ty("Int", "scalar"), vec![]),
            ] },
            { "name": "UserCountOutputType", "fields": [
                output("posts", false, ty("Int", "scalar"), vec![]),
            ] },
        ],
        "model": [
            { "name": "User", "fields": [
                output("id", false, ty("Int", "scalar"), vec![]),
                output("email", false, ty("String", "scalar"), vec![]),
                output("name", true, ty("String", "scalar"), vec![]),
                output("role", false, ty("Role", "enumTypes"), vec![]),
                output("posts", false, model_ty("Post", true), find_many_args("Post")),
                output("_count", false, ty("UserCountOutputType", "outputObjectTypes"), vec![]),
            ] },
            { "name": "Post", "fields": [
                output("id", false, ty("Int", "scalar"), vec![]),
                output("title", false, ty("String", "scalar"), vec![]),
                output("published", false, ty("Boolean", "scalar"), vec![]),
                output("createdAt", false, ty("DateTime", "scalar"), vec![]),
                output("authorId", false, ty("Int", "scalar"), vec![]),
                output("author", false, model_ty("User", false), vec![]),
            ] },
        ],
    })
}

/// Raw JSON of a two-model blog schema
pub fn blog_json() -> Value {
    json!({
        "datamodel": {
            "models": [
                {
                    "name": "User",
                    "fields": [
                        field("id", "scalar", "Int", json!({ "isId": true, "hasDefaultValue": true })),
                        field("email", "scalar", "String", json!({ "isUnique": true })),
                        field("name", "scalar", "String", json!({
                            "isRequired": false,
                            "documentation": "Public name\n@TypeGraphQL.field(name: \"displayName\")"
                        })),
                        field("password", "scalar", "String", json!({
                            "documentation": "@TypeGraphQL.omit(output: true, input: [\"where\", \"orderBy\"])"
                        })),
                        field("role", "enum", "Role", json!({})),
                        field("posts", "object", "Post", json!({ "isList": true, "isRequired": true, "relationName": "PostToUser" })),
                    ],
                },
                {
                    "name": "Post",
                    "documentation": "A blog entry",
                    "fields": [
                        field("id", "scalar", "Int", json!({ "isId": true, "hasDefaultValue": true })),
                        field("title", "scalar", "String", json!({})),
                        field("published", "scalar", "Boolean", json!({ "hasDefaultValue": true })),
                        field("createdAt", "scalar", "DateTime", json!({ "hasDefaultValue": true })),
                        field("authorId", "scalar", "Int", json!({ "isReadOnly": true })),
                        field("author", "object", "User", json!({ "relationName": "PostToUser" })),
                    ],
                },
            ],
            "enums": [
                { "name": "Role", "values": [{ "name": "USER" }, { "name": "ADMIN" }] },
            ],
            "types": [],
        },
        "schema": {
            "enumTypes": {
                "prisma": [
                    { "name": "SortOrder", "values": ["asc", "desc"] },
                    { "name": "UserScalarFieldEnum", "values": ["id", "email", "name", "password", "role"] },
                    { "name": "PostScalarFieldEnum", "values": ["id", "title", "published", "createdAt", "authorId"] },
                ],
                "model": [
                    { "name": "Role", "values": ["USER", "ADMIN"] },
                ],
            },
            "inputObjectTypes": input_object_types(),
            "outputObjectTypes": output_object_types(),
        },
        "mappings": {
            "modelOperations": [
                {
                    "model": "Post",
                    "plural": "posts",
                    "findUnique": "findUniquePost",
                    "findMany": "findManyPost",
                    "aggregate": "aggregatePost",
                    "createOne": "createOnePost",
                    "updateOne": "updateOnePost",
                    "deleteMany": "deleteManyPost",
                    "findRaw": "findPostRaw",
                },
                {
                    "model": "User",
                    "plural": "users",
                    "findUnique": "findUniqueUser",
                    "findMany": "findManyUser",
                    "createOne": "createOneUser",
                },
            ],
            "otherOperations": { "read": [], "write": [] },
        },
    })
}

/// The blog schema, decoded
pub fn blog() -> raw::Document {
    serde_json::from_value(blog_json()).expect("fixture decodes")
}

fn push(array: &mut Value, item: Value) {
    array.as_array_mut().expect("fixture array").push(item);
}

/// The blog schema with an embedded `Address` type on `User`
pub fn blog_with_address() -> raw::Document {
    let mut value = blog_json();
    value["datamodel"]["types"] = json!([{
        "name": "Address",
        "fields": [
            field("street", "scalar", "String", json!({})),
            field("city", "scalar", "String", json!({})),
        ],
    }]);
    push(
        &mut value["datamodel"]["models"][0]["fields"],
        field("address", "object", "Address", json!({})),
    );
    push(
        &mut value["schema"]["outputObjectTypes"]["model"][0]["fields"],
        output("address", false, model_ty("Address", false), vec![]),
    );
    push(
        &mut value["schema"]["outputObjectTypes"]["model"],
        json!({ "name": "Address", "fields": [
            output("street", false, ty("String", "scalar"), vec![]),
            output("city", false, ty("String", "scalar"), vec![]),
        ] }),
    );
    serde_json::from_value(value).expect("fixture decodes")
}

/// The blog schema with `User` hidden from output, still referenced by a result type
pub fn blog_with_hidden_user() -> raw::Document {
    let mut value = blog_json();
    value["datamodel"]["models"][0]["documentation"] = json!("@TypeGraphQL.omit(output: true)");
    push(
        &mut value["schema"]["outputObjectTypes"]["prisma"],
        json!({ "name": "CreateManyPostAndReturnOutputType", "fields": [
            output("id", false, ty("Int", "scalar"), vec![]),
            output("author", false, model_ty("User", false), vec![]),
        ] }),
    );
    serde_json::from_value(value).expect("fixture decodes")
}

/// A single `Post { id, title, authorId }` model without relations
pub fn single_post() -> raw::Document {
    let value = json!({
        "datamodel": {
            "models": [{
                "name": "Post",
                "fields": [
                    field("id", "scalar", "Int", json!({ "isId": true, "hasDefaultValue": true })),
                    field("title", "scalar", "String", json!({})),
                    field("authorId", "scalar", "Int", json!({})),
                ],
            }],
            "enums": [],
        },
        "schema": {
            "enumTypes": { "prisma": [{ "name": "SortOrder", "values": ["asc", "desc"] }] },
            "inputObjectTypes": { "prisma": [
                { "name": "PostWhereInput", "fields": [
                    input("id", false, vec![ty("Int", "scalar")]),
                    input("title", false, vec![ty("String", "scalar")]),
                ] },
                { "name": "PostWhereUniqueInput", "fields": [
                    input("id", false, vec![ty("Int", "scalar")]),
                ] },
                { "name": "PostCreateInput", "fields": [
                    input("title", true, vec![ty("String", "scalar")]),
                    input("authorId", true, vec![ty("Int", "scalar")]),
                ] },
                { "name": "PostUpdateInput", "fields": [
                    input("title", false, vec![ty("String", "scalar")]),
                ] },
            ] },
            "outputObjectTypes": {
                "prisma": [
                    { "name": "Query", "fields": [
                        output("findUniquePost", true, model_ty("Post", false), vec![
                            input("where", true, vec![ty("PostWhereUniqueInput", "inputObjectTypes")]),
                        ]),
                        output("findManyPost", false, model_ty("Post", true), vec![
                            input("where", false, vec![ty("PostWhereInput", "inputObjectTypes")]),
                        ]),
                    ] },
                    { "name": "Mutation", "fields": [
                        output("createOnePost", false, model_ty("Post", false), vec![
                            input("data", true, vec![ty("PostCreateInput", "inputObjectTypes")]),
                        ]),
                        output("updateOnePost", true, model_ty("Post", false), vec![
                            input("data", true, vec![ty("PostUpdateInput", "inputObjectTypes")]),
                            input("where", true, vec![ty("PostWhereUniqueInput", "inputObjectTypes")]),
                        ]),
                        output("deleteOnePost", true, model_ty("Post", false), vec![
                            input("where", true, vec![ty("PostWhereUniqueInput", "inputObjectTypes")]),
                        ]),
                    ] },
                ],
                "model": [
                    { "name": "Post", "fields": [
                        output("id", false, ty("Int", "scalar"), vec![]),
                        output("title", false, ty("String", "scalar"), vec![]),
                        output("authorId", false, ty("Int", "scalar"), vec![]),
                    ] },
                ],
            },
        },
        "mappings": {
            "modelOperations": [{
                "model": "Post",
                "plural": "posts",
                "findUnique": "findUniquePost",
                "findMany": "findManyPost",
                "createOne": "createOnePost",
                "updateOne": "updateOnePost",
                "deleteOne": "deleteOnePost",
            }],
        },
    });
    serde_json::from_value(value).expect("fixture decodes")
}
