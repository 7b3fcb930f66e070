use inv_ident::{
    invert, run_config, CancelToken, Config, Error, Inverter, Relation, RelationReader,
    RelationWriter, Sink, Source,
};
use serde_json::{json, Value};
use tempfile::tempdir;

fn relations(output: &[u8]) -> Vec<Value> {
    let v: Value = serde_json::from_slice(output).expect("output is valid json");
    let obj = v.as_object().expect("top level object");
    assert_eq!(obj.len(), 1);
    v["relations"].as_array().expect("relations array").clone()
}

fn scenario(subject_relation: &str) -> String {
    json!({
        "relations": [
            {"objectType": "user", "objectId": "u1", "relation": "identifier",
             "subjectType": "identity", "subjectId": "i1", "subjectRelation": subject_relation},
            {"objectType": "group", "objectId": "g1", "relation": "member",
             "subjectType": "user", "subjectId": "u2", "subjectRelation": ""}
        ]
    })
    .to_string()
}

#[test]
fn identifier_relations_are_inverted() {
    let input = scenario("");
    let mut output = Vec::new();
    invert(input.as_bytes(), &mut output).unwrap();

    let rels = relations(&output);
    assert_eq!(
        rels,
        vec![
            json!({"objectType": "identity", "objectId": "i1", "relation": "identifier",
                   "subjectType": "user", "subjectId": "u1", "subjectRelation": ""}),
            json!({"objectType": "group", "objectId": "g1", "relation": "member",
                   "subjectType": "user", "subjectId": "u2", "subjectRelation": ""}),
        ]
    );
}

#[test]
fn subject_relation_on_identifier_aborts() {
    let input = scenario("x");
    let mut output = Vec::new();
    match invert(input.as_bytes(), &mut output) {
        Err(Error::InvariantViolation(rel)) => {
            assert_eq!(rel.object_id, "u1");
            assert_eq!(rel.subject_relation, "x");
        }
        other => panic!("expected invariant violation, got {:?}", other),
    }
    // nothing was written before the violation, the container is still closed
    assert!(relations(&output).is_empty());
}

#[test]
fn unknown_field_relation_is_dropped() {
    let input = r#"{"relations":[
        {"objectType":"group","objectId":"g1","relation":"member","subjectType":"user","subjectId":"u1"},
        {"objectType":"group","objectId":"g2","relation":"member","subjectType":"user","subjectId":"u2","etag":"17"},
        {"objectType":"user","objectId":"u3","relation":"identifier","subjectType":"identity","subjectId":"i3"}
    ]}"#;
    let mut output = Vec::new();
    let stats = Inverter::new().run(input.as_bytes(), &mut output).unwrap();
    assert_eq!(stats.read, 3);
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.written, 2);
    assert_eq!(stats.swapped, 1);

    let rels = relations(&output);
    assert_eq!(rels.len(), 2);
    assert_eq!(rels[0]["objectId"], "g1");
    assert_eq!(rels[1]["objectId"], "i3");
    assert_eq!(rels[1]["subjectId"], "u3");
}

#[test]
fn snake_case_input_is_written_camel_case() {
    let input = r#"{"relations":[{"object_type":"user","object_id":"u1","relation":"identifier","subject_type":"identity","subject_id":"i1","subject_relation":""}]}"#;
    let mut output = Vec::new();
    invert(input.as_bytes(), &mut output).unwrap();
    let rels = relations(&output);
    assert_eq!(rels[0]["objectType"], "identity");
    assert_eq!(rels[0]["subjectType"], "user");
}

#[test]
fn writer_output_reads_back_in_order() {
    let written: Vec<Relation> = (0..25)
        .map(|i| Relation::new("group", format!("g{}", i), "member", "user", format!("u{}", i)))
        .collect();
    let mut buf = Vec::new();
    {
        let mut w = RelationWriter::new(&mut buf, "relations").unwrap();
        for rel in &written {
            w.write(rel).unwrap();
        }
        w.close().unwrap();
    }
    let read: Vec<Relation> = RelationReader::new(&buf[..])
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(read, written);
}

#[test]
fn empty_input_array() {
    let mut output = Vec::new();
    let stats = Inverter::new()
        .run(&br#"{"relations":[]}"#[..], &mut output)
        .unwrap();
    assert_eq!(stats.written, 0);
    assert_eq!(output, b"{\"relations\":[]}\n");
}

#[test]
fn run_config_between_files() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.json");
    std::fs::write(&input, scenario("")).unwrap();

    let config = Config::builder()
        .source(Source::Path(input))
        .sink(Sink::Path(output.clone()))
        .field("objects")
        .build()
        .unwrap();
    let stats = run_config(&config, CancelToken::new()).unwrap();
    assert_eq!(stats.written, 2);

    let v: Value = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(v["objects"][0]["objectType"], "identity");
    assert_eq!(v["objects"][1]["objectType"], "group");
}

#[test]
fn run_config_rejects_directory_source() {
    let dir = tempdir().unwrap();
    let config = Config::builder()
        .source(Source::Path(dir.path().to_path_buf()))
        .sink(Sink::Path(dir.path().join("out.json")))
        .build()
        .unwrap();
    let err = run_config(&config, CancelToken::new()).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(err.to_string().ends_with("not found"));
    // the sink is resolved after the source, so nothing was created
    assert!(!dir.path().join("out.json").exists());
}
