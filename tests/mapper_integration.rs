//! Document-level tests for the mapper
//!
//! These tests build resource graphs the way an ORM would hand them over
//! and check the complete JSON-API documents produced from them.

use jsonapi_mapper::{
    Data, Extras, Included, Mapper, MappingOptions, OmitRule, Pagination, RelationsOption,
    Resource, SerializerOverrides, TypeForModel,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

const DOMAIN: &str = "https://domain.com";

fn map(data: impl Into<Data>, type_name: &str, options: &MappingOptions) -> Value {
    Mapper::new(DOMAIN)
        .map(Some(&data.into()), type_name, options)
        .unwrap()
}

fn map_default(data: impl Into<Data>, type_name: &str) -> Value {
    map(data, type_name, &MappingOptions::default())
}

fn model(attrs: Value) -> Resource {
    Resource::new(attrs)
}

fn collection(items: Vec<Resource>) -> Data {
    Data::Set(items)
}

fn link_keys(doc: &Value) -> Vec<String> {
    doc["links"]
        .as_object()
        .map(|links| links.keys().cloned().collect())
        .unwrap_or_default()
}

fn included_types(doc: &Value) -> Vec<String> {
    doc["included"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i["type"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

mod adapter_tests {
    use super::*;

    #[test]
    fn test_basic_model() {
        let doc = map_default(
            model(json!({
                "id": "5",
                "name": "A test model",
                "description": "something to use as a test"
            })),
            "models",
        );

        assert_eq!(doc["data"]["id"], "5");
        assert_eq!(doc["data"]["type"], "models");
        assert_eq!(
            doc["data"]["attributes"],
            json!({"name": "A test model", "description": "something to use as a test"})
        );
    }

    #[test]
    fn test_custom_id_attribute() {
        let doc = map_default(
            model(json!({
                "email": "foo@example.com",
                "name": "A test model",
                "description": "something to use as a test"
            }))
            .with_id_attribute("email"),
            "models",
        );

        assert_eq!(doc["data"]["id"], "foo@example.com");
        assert_eq!(
            doc["data"]["attributes"],
            json!({"name": "A test model", "description": "something to use as a test"})
        );
    }

    #[test]
    fn test_related_custom_id_attribute() {
        let related = model(json!({"email": "foo@example.com", "attr2": "value2"}))
            .with_id_attribute("email");
        let doc = map_default(
            model(json!({"id": 5, "name": "A test model"})).with_relation("related-model", related),
            "models",
        );

        assert_eq!(
            doc["data"]["relationships"]["related-model"],
            json!({
                "data": {"type": "related-models", "id": "foo@example.com"},
                "links": {
                    "self": "https://domain.com/models/5/relationships/related-model",
                    "related": "https://domain.com/models/5/related-model"
                }
            })
        );
        assert_eq!(doc["included"][0]["id"], "foo@example.com");
        assert_eq!(doc["included"][0]["type"], "related-models");
        assert_eq!(doc["included"][0]["attributes"], json!({"attr2": "value2"}));
    }

    #[test]
    fn test_collection_custom_id_attribute() {
        let items = (1..=2)
            .map(|n| {
                model(json!({"email": format!("foo{}@example.com", n), "name": "x"}))
                    .with_id_attribute("email")
            })
            .collect();
        let doc = map_default(collection(items), "models");

        assert_eq!(doc["data"][0]["id"], "foo1@example.com");
        assert_eq!(doc["data"][1]["id"], "foo2@example.com");
        assert_eq!(doc["data"][1]["attributes"], json!({"name": "x"}));
    }

    #[test]
    fn test_absent_data() {
        let doc = Mapper::new(DOMAIN)
            .map(None, "models", &MappingOptions::default())
            .unwrap();
        assert_eq!(doc, json!({"data": null}));
    }

    #[test]
    fn test_id_attribute_omitted_from_attributes() {
        let doc = map_default(model(json!({"id": 1, "attr": "value"})), "models");
        assert!(doc["data"]["attributes"].get("id").is_none());

        let doc = map_default(
            model(json!({"email": "x@example.com", "id": 3})).with_id_attribute("email"),
            "models",
        );
        // Only the id attribute is omitted, a plain `id` column stays
        assert_eq!(doc["data"]["attributes"], json!({"id": 3}));
    }

    #[test]
    fn test_omit_patterns() {
        let options = MappingOptions {
            omit_attrs: Some(vec![
                OmitRule::pattern("^id$").unwrap(),
                OmitRule::pattern("[_-]id$").unwrap(),
            ]),
            ..Default::default()
        };
        let doc = map(
            model(json!({"id": 1, "attr": "value", "related_id": 2, "another-id": 3, "paid": true})),
            "models",
            &options,
        );
        assert_eq!(doc["data"]["attributes"], json!({"attr": "value", "paid": true}));
    }

    #[test]
    fn test_omit_exact_names() {
        let options = MappingOptions {
            omit_attrs: Some(vec![OmitRule::exact("id"), OmitRule::exact("to-omit")]),
            ..Default::default()
        };
        let doc = map(
            model(json!({"id": 1, "attr": "value", "to-omit": 1, "not-to-omit": 2})),
            "models",
            &options,
        );
        assert_eq!(doc["data"]["attributes"], json!({"attr": "value", "not-to-omit": 2}));
    }

    #[test]
    fn test_empty_omit_list_keeps_id() {
        let options = MappingOptions {
            omit_attrs: Some(Vec::new()),
            ..Default::default()
        };
        let doc = map(model(json!({"id": 1, "attr": "value"})), "models", &options);
        assert_eq!(doc["data"]["attributes"], json!({"id": 1, "attr": "value"}));
    }

    #[test]
    fn test_empty_collection() {
        let doc = map_default(collection(Vec::new()), "models");
        assert_eq!(doc["data"], json!([]));
        assert!(doc.get("included").is_none());
    }

    #[test]
    fn test_collection() {
        let items = (0..5)
            .map(|n| model(json!({"id": n, "attr": format!("value{}", n)})))
            .collect();
        let doc = map_default(collection(items), "models");

        let data = doc["data"].as_array().unwrap();
        assert_eq!(data.len(), 5);
        for (n, item) in data.iter().enumerate() {
            assert_eq!(item["id"], n.to_string());
            assert_eq!(item["type"], "models");
            assert_eq!(item["attributes"]["attr"], format!("value{}", n));
        }
    }
}

mod included_tests {
    use super::*;

    #[test]
    fn test_repeated_model_included_once() {
        let related = model(json!({"id": 4, "attr": "first value"}));
        let doc = map_default(
            model(json!({"id": 5, "name": "A test model"}))
                .with_relation("relateds", vec![related.clone()])
                .with_relation("related", related),
            "models",
        );

        // `related` and `relateds` pluralize to the same type
        let relationships = &doc["data"]["relationships"];
        assert_eq!(relationships["relateds"]["data"], json!([{"type": "relateds", "id": "4"}]));
        assert_eq!(relationships["related"]["data"], json!({"type": "relateds", "id": "4"}));

        let included = doc["included"].as_array().unwrap();
        assert_eq!(included.len(), 1);
        assert_eq!(included[0]["attributes"], json!({"attr": "first value"}));
    }

    #[test]
    fn test_nested_relationships() {
        let nested = model(json!({"id": "7", "attr": "value"}));
        let related = model(json!({"id": "6", "attr": "value"}))
            .with_relation("nested-related-model", nested);
        let doc = map_default(
            model(json!({"id": "5", "attr": "value"})).with_relation("related-model", related),
            "models",
        );

        assert_eq!(
            doc["data"]["relationships"]["related-model"]["data"],
            json!({"type": "related-models", "id": "6"})
        );
        assert_eq!(
            doc["included"],
            json!([
                {
                    "type": "related-models",
                    "id": "6",
                    "attributes": {"attr": "value"},
                    "links": {"self": "https://domain.com/related-models/6"},
                    "relationships": {
                        "nested-related-model": {
                            "data": {"type": "nested-related-models", "id": "7"},
                            "links": {
                                "self": "https://domain.com/related-models/6/relationships/nested-related-model",
                                "related": "https://domain.com/related-models/6/nested-related-model"
                            }
                        }
                    }
                },
                {
                    "type": "nested-related-models",
                    "id": "7",
                    "attributes": {"attr": "value"},
                    "links": {"self": "https://domain.com/nested-related-models/7"}
                }
            ])
        );
    }

    #[test]
    fn test_nested_has_many_within_collection() {
        let related = model(json!({"id": "6", "attr": "value"})).with_relation(
            "nested-related-models",
            vec![
                model(json!({"id": "10", "attr": "value"})),
                model(json!({"id": "11", "attr": "value"})),
            ],
        );
        let doc = map_default(
            collection(vec![
                model(json!({"id": "5", "attr": "value"})).with_relation("related-model", related)
            ]),
            "models",
        );

        assert_eq!(
            included_types(&doc),
            vec!["related-models", "nested-related-models", "nested-related-models"]
        );
        assert_eq!(
            doc["included"][0]["relationships"]["nested-related-models"]["data"],
            json!([
                {"type": "nested-related-models", "id": "10"},
                {"type": "nested-related-models", "id": "11"}
            ])
        );
        assert_eq!(doc["included"][1]["id"], "10");
        assert_eq!(doc["included"][2]["id"], "11");
    }

    #[test]
    fn test_relation_empty_on_first_member() {
        let first = model(json!({"id": "5", "attr": "value"}))
            .with_relation("related-models", Vec::<Resource>::new());
        let second = model(json!({"id": "6", "attr": "value"})).with_relation(
            "related-models",
            vec![
                model(json!({"id": "12", "attr2": "value22"})),
                model(json!({"id": "13", "attr2": "value23"})),
            ],
        );
        let doc = map_default(collection(vec![first, second]), "models");

        assert_eq!(doc["data"][0]["relationships"]["related-models"]["data"], json!([]));
        assert_eq!(doc["included"][0]["attributes"], json!({"attr2": "value22"}));
        assert_eq!(doc["included"][1]["attributes"], json!({"attr2": "value23"}));
    }

    #[test]
    fn test_merged_template() {
        let items = (0..3)
            .map(|n| {
                let rels = if n == 0 {
                    vec![model(json!({"id": 3, "attr": "value"}))]
                } else {
                    Vec::new()
                };
                model(json!({"id": n, "attr": format!("value{}", n)})).with_relation("rels", rels)
            })
            .collect();
        let doc = map_default(collection(items), "models");

        assert_eq!(
            doc["data"][0]["relationships"]["rels"]["data"],
            json!([{"type": "rels", "id": "3"}])
        );
        assert_eq!(doc["data"][1]["relationships"]["rels"]["data"], json!([]));
        assert_eq!(doc["included"][0]["attributes"], json!({"attr": "value"}));
    }

    #[test]
    fn test_empty_related_record_not_included() {
        let with_bar = model(json!({"id": 14428, "bar_id": 59, "name": "Bla #14428"}))
            .with_relation("foo", model(json!({"id": 2973, "name": "Foo #2973"})))
            .with_relation("bar", model(json!({"id": 59, "name": "Bar #59"})));
        let without_bar = model(json!({"id": 14417, "bar_id": null, "name": "Bla #14417"}))
            .with_relation("foo", model(json!({"id": 2973, "name": "Foo #2973"})))
            .with_relation("bar", model(json!({})));

        for members in [
            vec![with_bar.clone(), without_bar.clone()],
            vec![without_bar, with_bar],
        ] {
            let doc = map_default(collection(members), "model");
            let ids: Vec<(String, String)> = doc["included"]
                .as_array()
                .unwrap()
                .iter()
                .map(|i| (i["type"].as_str().unwrap().to_string(), i["id"].as_str().unwrap().to_string()))
                .collect();
            assert_eq!(
                ids,
                vec![
                    ("foos".to_string(), "2973".to_string()),
                    ("bars".to_string(), "59".to_string())
                ]
            );
        }
    }

    #[test]
    fn test_repeated_record_rendered_with_all_its_columns() {
        let sparse = model(json!({"id": 1})).with_table_name("users");
        let rich = model(json!({"id": 1, "email": "joe@example.com"}))
            .with_table_name("users")
            .with_relation(
                "organization",
                model(json!({"id": 9, "name": "Acme"})).with_table_name("orgs"),
            );
        let doc = map_default(collection(vec![sparse, rich]), "user");

        assert!(doc["data"][0].get("attributes").is_none());
        assert_eq!(doc["data"][1]["attributes"], json!({"email": "joe@example.com"}));
        assert_eq!(
            doc["data"][1]["relationships"]["organization"]["data"],
            json!({"type": "organizations", "id": "9"})
        );
        assert_eq!(included_types(&doc), vec!["organizations"]);
    }

    #[test]
    fn test_user_with_organization() {
        let user = model(json!({
            "id": 1,
            "email": "email@gmail.com",
            "first_name": "Ad",
            "org_id": 1,
            "connect_type": "",
            "created_at": "2016-07-04T10:48:27.000Z"
        }))
        .with_relation(
            "organization",
            model(json!({"id": 1, "phone": "", "company_name": "MyCompany"})),
        );
        let doc = map_default(user, "user");

        assert_eq!(doc["data"]["type"], "users");
        assert_eq!(doc["data"]["id"], "1");
        assert_eq!(
            doc["data"]["relationships"]["organization"]["data"],
            json!({"type": "organizations", "id": "1"})
        );
        assert_eq!(doc["included"][0]["type"], "organizations");
        assert_eq!(doc["included"][0]["id"], "1");
        assert_eq!(doc["data"]["attributes"]["connect_type"], "");
    }
}

mod links_tests {
    use super::*;

    fn page(limit: u64, offset: u64, total: u64) -> MappingOptions {
        MappingOptions {
            pagination: Some(Pagination::new(limit, offset, total)),
            ..Default::default()
        }
    }

    fn ten() -> Data {
        collection(
            (0..10)
                .map(|n| model(json!({"id": n, "attr": format!("value{}", n)})))
                .collect(),
        )
    }

    #[test]
    fn test_top_level_links() {
        let doc = map_default(model(json!({"id": "5", "attr": "value"})), "models");
        assert_eq!(doc["links"], json!({"self": "https://domain.com/models"}));
        assert_eq!(
            doc["data"]["links"],
            json!({"self": "https://domain.com/models/5"})
        );

        let doc = map_default(ten(), "model");
        assert_eq!(doc["links"]["self"], "https://domain.com/models");
        assert_eq!(doc["data"][3]["links"]["self"], "https://domain.com/models/3");
    }

    #[test]
    fn test_pagination_links() {
        let doc = map(ten(), "models", &page(10, 40, 100));
        assert_eq!(
            doc["links"],
            json!({
                "self": "https://domain.com/models",
                "first": "https://domain.com/models?page[limit]=10&page[offset]=0",
                "prev": "https://domain.com/models?page[limit]=10&page[offset]=30",
                "next": "https://domain.com/models?page[limit]=10&page[offset]=50",
                "last": "https://domain.com/models?page[limit]=10&page[offset]=90"
            })
        );
    }

    #[test]
    fn test_no_pagination_without_data() {
        let doc = map_default(ten(), "models");
        assert_eq!(link_keys(&doc), vec!["self"]);
    }

    #[test]
    fn test_row_count() {
        let options = MappingOptions {
            pagination: Some(Pagination {
                limit: Some(10),
                offset: Some(40),
                total: None,
                row_count: Some(100),
            }),
            ..Default::default()
        };
        let doc = map(ten(), "models", &options);
        assert_eq!(
            doc["links"]["last"],
            "https://domain.com/models?page[limit]=10&page[offset]=90"
        );
    }

    #[test]
    fn test_edge_pages() {
        let doc = map(collection(Vec::new()), "models", &page(5, 0, 10));
        assert_eq!(link_keys(&doc), vec!["self", "next", "last"]);

        let doc = map(collection(Vec::new()), "models", &page(5, 5, 10));
        assert_eq!(link_keys(&doc), vec!["self", "first", "prev"]);

        let doc = map(collection(Vec::new()), "models", &page(10, 40, 0));
        assert_eq!(link_keys(&doc), vec!["self"]);

        let doc = map(ten(), "models", &page(10, 0, 5));
        assert_eq!(link_keys(&doc), vec!["self"]);
    }

    #[test]
    fn test_last_page_does_not_overlap() {
        let doc = map(ten(), "models", &page(3, 3, 10));
        assert_eq!(
            doc["links"]["next"],
            "https://domain.com/models?page[limit]=3&page[offset]=6"
        );
        assert_eq!(
            doc["links"]["last"],
            "https://domain.com/models?page[limit]=1&page[offset]=9"
        );
    }

    #[test]
    fn test_out_of_range_offset_omits_pagination() {
        let doc = map(ten(), "models", &page(10, u64::MAX, 100));
        assert_eq!(link_keys(&doc), vec!["self"]);
    }

    #[test]
    fn test_query_kept_in_pagination_links() {
        let mut options = page(10, 0, 30);
        options.query = json!({"filter": {"name": "joe doe"}, "page": {"limit": 1}})
            .as_object()
            .cloned()
            .unwrap();
        let doc = map(ten(), "models", &options);
        assert_eq!(
            doc["links"]["next"],
            "https://domain.com/models?filter[name]=joe%20doe&page[limit]=10&page[offset]=10"
        );
    }

    #[test]
    fn test_links_disabled() {
        let related = model(json!({"id": "6", "attr": "value"}))
            .with_relation("nested-related-models", vec![model(json!({"id": "10", "attr": "value"}))]);
        let options = MappingOptions {
            enable_links: false,
            ..Default::default()
        };
        let doc = map(
            collection(vec![
                model(json!({"id": "5", "attr": "value"})).with_relation("related-model", related)
            ]),
            "models",
            &options,
        );

        assert!(doc.get("links").is_none());
        assert!(doc["data"][0].get("links").is_none());
        assert!(doc["data"][0]["relationships"]["related-model"].get("links").is_none());
        assert!(doc["included"][0].get("links").is_none());
        assert!(doc["included"][1].get("links").is_none());
    }
}

mod relations_tests {
    use super::*;

    fn two_relations() -> Resource {
        model(json!({"id": "5", "attr": "value"}))
            .with_relation("related-one", model(json!({"id": "10", "attr1": "value1"})))
            .with_relation("related-two", model(json!({"id": "20", "attr2": "value2"})))
    }

    fn with_relations(relations: RelationsOption) -> MappingOptions {
        MappingOptions {
            relations,
            ..Default::default()
        }
    }

    #[test]
    fn test_ignore_relations() {
        let doc = map(two_relations(), "models", &with_relations(RelationsOption::All(false)));
        assert!(doc["data"].get("relationships").is_none());
        assert!(doc.get("included").is_none());
    }

    #[test]
    fn test_serialize_without_including() {
        let doc = map(
            two_relations(),
            "models",
            &with_relations(RelationsOption::Select {
                fields: None,
                included: Some(Included::All(false)),
            }),
        );
        assert!(doc["data"]["relationships"].get("related-one").is_some());
        assert!(doc["data"]["relationships"].get("related-two").is_some());
        assert!(doc.get("included").is_none());
    }

    #[test]
    fn test_choose_relations_to_add() {
        let fields = Some(vec!["related-two".to_string()]);
        let doc = map(
            two_relations(),
            "models",
            &with_relations(RelationsOption::Select {
                fields: fields.clone(),
                included: Some(Included::All(true)),
            }),
        );
        assert_eq!(
            doc["included"],
            json!([{
                "type": "related-twos",
                "id": "20",
                "attributes": {"attr2": "value2"},
                "links": {"self": "https://domain.com/related-twos/20"}
            }])
        );
        assert!(doc["data"]["relationships"].get("related-one").is_none());

        let doc = map(
            two_relations(),
            "models",
            &with_relations(RelationsOption::Select {
                fields,
                included: Some(Included::All(false)),
            }),
        );
        assert!(doc["data"]["relationships"].get("related-two").is_some());
        assert!(doc.get("included").is_none());
    }

    #[test]
    fn test_choose_relations_to_include() {
        let doc = map(
            two_relations(),
            "models",
            &with_relations(RelationsOption::Select {
                fields: None,
                included: Some(Included::Only(vec!["related-two".to_string()])),
            }),
        );
        assert_eq!(included_types(&doc), vec!["related-twos"]);

        let doc = map(
            two_relations(),
            "models",
            &with_relations(RelationsOption::Select {
                fields: Some(vec!["related-one".to_string()]),
                included: Some(Included::Only(vec![
                    "related-one".to_string(),
                    "related-two".to_string(),
                ])),
            }),
        );
        assert_eq!(included_types(&doc), vec!["related-ones"]);
    }

    #[test]
    fn test_type_table() {
        let resource = two_relations()
            .with_relation("related-three", model(json!({"id": "30", "attr3": "value3"})));
        let table: HashMap<String, String> = [
            ("related-one".to_string(), "inners".to_string()),
            ("related-two".to_string(), "non-plural".to_string()),
        ]
        .into_iter()
        .collect();
        let options = MappingOptions {
            type_for_model: Some(TypeForModel::PerRelation(table)),
            ..Default::default()
        };
        let doc = map(resource, "resource", &options);

        assert_eq!(doc["data"]["type"], "resources");
        assert_eq!(
            included_types(&doc),
            vec!["inners", "non-plural", "related-threes"]
        );
    }

    #[test]
    fn test_type_function() {
        let options = MappingOptions {
            type_for_model: Some(TypeForModel::Uniform(Arc::new(|_: &str| "models".to_string()))),
            ..Default::default()
        };
        let doc = map(two_relations(), "resource", &options);
        assert_eq!(doc["data"]["type"], "models");
        assert_eq!(included_types(&doc), vec!["models", "models"]);
    }

    #[test]
    fn test_key_function() {
        let options = MappingOptions {
            key_for_attr: Some(Arc::new(|key: &str| key.to_uppercase())),
            ..Default::default()
        };
        let doc = map(two_relations(), "models", &options);

        assert_eq!(doc["data"]["attributes"], json!({"ATTR": "value"}));
        assert_eq!(doc["included"][0]["attributes"], json!({"ATTR1": "value1"}));
        assert_eq!(doc["included"][1]["attributes"], json!({"ATTR2": "value2"}));
        assert!(doc["data"]["relationships"].get("RELATED-ONE").is_some());
    }
}

mod serializer_options_tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_call_options() {
        let overrides = SerializerOverrides {
            type_for_attribute: Some(Arc::new(|_: &str| "type".to_string())),
            key_for_attribute: Some(Arc::new(|_: &str| "key".to_string())),
            meta: Some(json!({"mapper": true})),
        };
        let mapper = Mapper::new(DOMAIN).with_overrides(overrides);
        let options = MappingOptions {
            type_for_model: Some(TypeForModel::Uniform(Arc::new(|_: &str| "ignored".to_string()))),
            meta: Some(json!({"call": true})),
            ..Default::default()
        };

        let data = model(json!({"id": 1, "oneAttr": "x"})).into();
        let doc = mapper.map(Some(&data), "models", &options).unwrap();

        assert_eq!(doc["data"]["type"], "type");
        assert_eq!(doc["data"]["attributes"], json!({"key": "x"}));
        assert_eq!(doc["meta"], json!({"mapper": true}));
    }

    #[test]
    fn test_meta() {
        let options = MappingOptions {
            meta: Some(json!({"copyright": "ACME"})),
            ..Default::default()
        };
        let doc = map(model(json!({"id": 1})), "models", &options);
        assert_eq!(doc["meta"], json!({"copyright": "ACME"}));
    }
}

mod visibility_tests {
    use super::*;

    fn user() -> Resource {
        model(json!({
            "id": 1,
            "first_name": "Joe",
            "last_name": "Doe",
            "email": "joe@doe.com"
        }))
    }

    #[test]
    fn test_visible() {
        let doc = map_default(
            user().with_visible(vec!["first_name".to_string(), "last_name".to_string()]),
            "users",
        );
        assert_eq!(doc["data"]["id"], "1");
        assert_eq!(
            doc["data"]["attributes"],
            json!({"first_name": "Joe", "last_name": "Doe"})
        );
    }

    #[test]
    fn test_hidden() {
        let doc = map_default(user().with_hidden(vec!["email".to_string()]), "users");
        assert_eq!(
            doc["data"]["attributes"],
            json!({"first_name": "Joe", "last_name": "Doe"})
        );
    }

    #[test]
    fn test_extras_override_resource_lists() {
        let options = MappingOptions {
            extras: Some(Extras {
                visible: Some(vec!["email".to_string()]),
                hidden: None,
            }),
            ..Default::default()
        };
        let doc = map(
            user().with_visible(vec!["first_name".to_string()]),
            "users",
            &options,
        );
        assert_eq!(doc["data"]["attributes"], json!({"email": "joe@doe.com"}));
    }

    #[test]
    fn test_virtuals() {
        let resource = user().with_virtual("full_name", json!("Joe Doe"));
        let doc = map_default(resource.clone(), "users");
        assert!(doc["data"]["attributes"].get("full_name").is_none());

        let options = MappingOptions {
            virtuals: true,
            ..Default::default()
        };
        let doc = map(resource, "users", &options);
        assert_eq!(doc["data"]["attributes"]["full_name"], "Joe Doe");
    }
}

#[test]
fn test_mapping_is_repeatable() {
    let mapper = Mapper::new(DOMAIN);
    let data = collection(vec![
        model(json!({"id": 1, "name": "a"}))
            .with_table_name("users")
            .with_relation("org", model(json!({"id": 7})).with_table_name("orgs")),
        model(json!({"id": 1, "name": "a"}))
            .with_table_name("users")
            .with_relation("org", model(json!({"id": 7})).with_table_name("orgs")),
    ]);
    let options = MappingOptions::default();

    let first = mapper.map(Some(&data), "users", &options).unwrap();
    let second = mapper.map(Some(&data), "users", &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["included"].as_array().map(Vec::len), Some(1));
}
