//! Editing scenarios on small loaded pipelines

use serde_json::json;
use workflow_model::{
    IdentifierError, NodeKey, PortStatus, Process, WorkflowModel, WorkflowModelError,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One step with four inputs; `inFile` feeds in[3], `reference` feeds in[2],
/// and the step's only output feeds the pipeline output.
fn one_step() -> WorkflowModel {
    init();
    WorkflowModel::from_json(
        &json!({
            "id": "one_step",
            "inputs": [
                {"id": "inFile", "type": "File"},
                {"id": "reference", "type": "File"}
            ],
            "outputs": [
                {"id": "outFile", "type": "File", "source": ["#io_tool.fileOutput"]}
            ],
            "steps": [{
                "id": "io_tool",
                "run": {
                    "id": "io_tool",
                    "inputs": [
                        {"id": "threads", "type": "int"},
                        {"id": "prefix", "type": "string"},
                        {"id": "reference", "type": "File"},
                        {"id": "inFile", "type": "File"}
                    ],
                    "outputs": [{"id": "fileOutput", "type": "File"}]
                },
                "in": [
                    {"id": "threads", "type": "int"},
                    {"id": "prefix", "type": "string"},
                    {"id": "reference", "type": "File", "status": "port", "source": ["#reference"]},
                    {"id": "inFile", "type": "File", "status": "port", "source": ["#inFile"]}
                ],
                "out": [{"id": "fileOutput", "type": "File", "status": "port"}]
            }]
        })
        .to_string(),
    )
    .unwrap()
}

/// `io_tool` feeds `io_tool_1` and both feed the pipeline output.
fn two_step() -> WorkflowModel {
    init();
    WorkflowModel::from_json(
        &json!({
            "id": "two_step",
            "inputs": [{"id": "inFile", "type": "File"}],
            "outputs": [
                {"id": "result", "type": "File", "source": ["#io_tool.result", "#io_tool_1.result"]}
            ],
            "steps": [
                {
                    "id": "io_tool",
                    "in": [{"id": "inFile", "status": "port", "source": ["#inFile"]}],
                    "out": [{"id": "result", "status": "port"}]
                },
                {
                    "id": "io_tool_1",
                    "in": [{"id": "inFile", "status": "port", "source": ["#io_tool.result"]}],
                    "out": [{"id": "result", "status": "port"}]
                }
            ]
        })
        .to_string(),
    )
    .unwrap()
}

fn step_input(model: &WorkflowModel, step: usize, port: usize) -> NodeKey {
    model.steps()[step].inputs()[port]
}

fn step_output(model: &WorkflowModel, step: usize, port: usize) -> NodeKey {
    model.steps()[step].outputs()[port]
}

fn assert_consistent(model: &WorkflowModel) {
    let errors = model.validate();
    assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
}

#[test]
fn test_fixtures_are_consistent() {
    let model = one_step();
    assert_consistent(&model);
    assert_eq!(model.connections().len(), 3);

    let model = two_step();
    assert_consistent(&model);
    assert_eq!(model.connections().len(), 4);
}

// -------------------------------------------------------------------------
// exposePort / includePort / clearPort
// -------------------------------------------------------------------------

#[test]
fn test_expose_adds_input_and_connection() {
    let mut model = one_step();
    let connections = model.connections().len();
    let inputs = model.inputs().len();
    let port = step_input(&model, 0, 1);

    model.expose_port(port).unwrap();

    assert_eq!(model.inputs().len(), inputs + 1);
    assert_eq!(model.inputs()[inputs].id(), model.port(port).unwrap().id());
    assert_eq!(model.connections().len(), connections + 1);
    assert_eq!(model.port(port).unwrap().status(), PortStatus::Exposed);
    assert!(!model.port(port).unwrap().is_visible());
    assert_consistent(&model);
}

#[test]
fn test_include_after_expose_restores_inputs() {
    let mut model = one_step();
    let inputs = model.inputs().len();
    let port = step_input(&model, 0, 1);

    model.expose_port(port).unwrap();
    assert_eq!(model.inputs().len(), inputs + 1);

    model.include_port(port).unwrap();
    assert_eq!(model.inputs().len(), inputs);
    assert_eq!(model.port(port).unwrap().status(), PortStatus::Port);
    assert!(model.port(port).unwrap().is_visible());

    model.expose_port(port).unwrap();
    assert_eq!(model.inputs().len(), inputs + 1);
    assert_eq!(model.port(port).unwrap().status(), PortStatus::Exposed);
    assert!(!model.port(port).unwrap().is_visible());
    assert_consistent(&model);
}

#[test]
fn test_expose_connected_port_replaces_input() {
    let mut model = one_step();
    let inputs = model.inputs().len();
    let nodes = model.nodes().len();
    let connections = model.connections().len();
    let port = step_input(&model, 0, 3);
    assert_eq!(model.port(port).unwrap().status(), PortStatus::Port);

    let input = model.expose_port(port).unwrap();

    assert_eq!(model.inputs().len(), inputs);
    assert_eq!(model.nodes().len(), nodes);
    assert_eq!(model.connections().len(), connections);
    assert_eq!(model.input(input).unwrap().id(), "inFile");
    assert_eq!(model.source_refs(port), vec!["#inFile"]);
    assert_eq!(model.port(port).unwrap().status(), PortStatus::Exposed);
    assert_consistent(&model);
}

#[test]
fn test_include_editable_port() {
    let mut model = one_step();
    let port = step_input(&model, 0, 1);
    assert_eq!(model.port(port).unwrap().status(), PortStatus::Editable);
    assert!(!model.port(port).unwrap().is_visible());

    model.include_port(port).unwrap();

    assert_eq!(model.port(port).unwrap().status(), PortStatus::Port);
    assert!(model.port(port).unwrap().is_visible());
    assert_consistent(&model);
}

#[test]
fn test_clear_port_removes_orphaned_input() {
    let mut model = one_step();
    let inputs = model.inputs().len();
    let connections = model.connections().len();
    let port = step_input(&model, 0, 3);

    model.clear_port(port).unwrap();

    assert_eq!(model.inputs().len(), inputs - 1);
    assert!(model.input_by_id("inFile").is_none());
    assert_eq!(model.connections().len(), connections - 1);
    assert_eq!(model.port(port).unwrap().status(), PortStatus::Editable);
    assert!(!model.port(port).unwrap().is_visible());
    assert!(model.port(port).unwrap().source().is_empty());
    assert_consistent(&model);
}

#[test]
fn test_clear_included_and_exposed_ports() {
    let mut model = one_step();
    let included = step_input(&model, 0, 0);
    let exposed = step_input(&model, 0, 1);

    model.include_port(included).unwrap();
    model.clear_port(included).unwrap();
    assert_eq!(model.port(included).unwrap().status(), PortStatus::Editable);
    assert!(!model.port(included).unwrap().is_visible());

    let inputs = model.inputs().len();
    model.expose_port(exposed).unwrap();
    model.clear_port(exposed).unwrap();
    assert_eq!(model.port(exposed).unwrap().status(), PortStatus::Editable);
    assert!(!model.port(exposed).unwrap().is_visible());
    assert_eq!(model.inputs().len(), inputs);
    assert_consistent(&model);
}

#[test]
fn test_clear_editable_port_changes_nothing() {
    let mut model = one_step();
    let before = model.to_document();
    let port = step_input(&model, 0, 0);

    model.clear_port(port).unwrap();

    assert_eq!(model.to_document(), before);
}

#[test]
fn test_clear_editable_port_drops_created_input() {
    let mut model = one_step();
    let inputs = model.inputs().len();
    let connections = model.connections().len();
    let port = step_input(&model, 0, 0);
    model.create_input_from_port(port).unwrap();
    assert_eq!(model.port(port).unwrap().status(), PortStatus::Editable);

    model.clear_port(port).unwrap();

    assert_eq!(model.inputs().len(), inputs);
    assert_eq!(model.connections().len(), connections);
    assert!(model.input_by_id("io_tool_threads").is_none());
    assert!(model.port(port).unwrap().source().is_empty());
    assert_consistent(&model);
}

#[test]
fn test_expose_and_include_keep_created_input() {
    let mut model = one_step();
    let port = step_input(&model, 0, 1);
    let created = model.create_input_from_port(port).unwrap();
    let inputs = model.inputs().len();
    let connections = model.connections().len();

    let exposed = model.expose_port(port).unwrap();
    assert_eq!(model.inputs().len(), inputs + 1);
    assert_eq!(model.connections().len(), connections + 1);
    assert_eq!(model.source_refs(port), vec!["#io_tool_prefix", "#prefix"]);

    model.include_port(port).unwrap();
    assert!(model.input(exposed).is_none());
    assert!(model.input(created).is_some());
    assert_eq!(model.inputs().len(), inputs);
    assert_eq!(model.connections().len(), connections);
    assert_eq!(model.source_refs(port), vec!["#io_tool_prefix"]);
    assert_consistent(&model);
}

// -------------------------------------------------------------------------
// addStepFromProcess
// -------------------------------------------------------------------------

#[test]
fn test_add_step_from_process() {
    let mut model = one_step();
    let process = model.steps()[0].run().clone();

    let first = model.add_step_from_process(process.clone());
    let second = model.add_step_from_process(process);

    assert_eq!(model.steps().len(), 3);
    let step = model.step(first).unwrap();
    assert_eq!(step.id(), "io_tool_1");
    assert_eq!(step.inputs().len(), 4);
    assert_eq!(step.outputs().len(), 1);
    assert_eq!(model.step(second).unwrap().id(), "io_tool_2");
    assert_consistent(&model);
}

// -------------------------------------------------------------------------
// Renames
// -------------------------------------------------------------------------

#[test]
fn test_change_step_id_rewrites_references() {
    let mut model = one_step();
    let connections = model.connections().len();
    let nodes = model.nodes().len();
    let step = model.steps()[0].key();

    model.change_step_id(step, "new_id").unwrap();

    assert_eq!(model.step(step).unwrap().id(), "new_id");
    assert_eq!(
        model.source_refs(model.outputs()[0].key()),
        vec!["#new_id.fileOutput"]
    );
    assert_eq!(model.connections().len(), connections);
    assert_eq!(model.nodes().len(), nodes);
    assert_consistent(&model);
}

#[test]
fn test_change_step_id_rewrites_step_inputs() {
    let mut model = two_step();
    let step = model.steps()[0].key();

    model.change_step_id(step, "new_id").unwrap();

    assert_eq!(model.source_refs(step_input(&model, 1, 0)), vec!["#new_id.result"]);
}

#[test]
fn test_change_step_id_leaves_other_references() {
    let mut model = two_step();
    let added = model.add_step_from_process(
        Process::new("io_tool_10")
            .with_input("left", json!("File"))
            .with_input("right", json!("File")),
    );
    let left = model.step(added).unwrap().inputs()[0];
    let right = model.step(added).unwrap().inputs()[1];
    let (first, second, input) = (
        step_output(&model, 0, 0),
        step_output(&model, 1, 0),
        model.inputs()[0].key(),
    );
    model.connect(second, left).unwrap();
    model.connect(first, right).unwrap();
    model.connect(input, right).unwrap();

    let references = |model: &WorkflowModel| -> Vec<(NodeKey, Vec<String>)> {
        model
            .nodes()
            .into_iter()
            .map(|node| (node.key(), model.source_refs(node.key())))
            .collect()
    };
    let before = references(&model);
    let counts = (model.nodes().len(), model.connections().len());

    let step = model.steps()[0].key();
    model.change_step_id(step, "renamed").unwrap();

    let expected: Vec<(NodeKey, Vec<String>)> = before
        .into_iter()
        .map(|(key, refs)| {
            let refs = refs
                .into_iter()
                .map(|r| match r.strip_prefix("#io_tool.") {
                    Some(port) => format!("#renamed.{port}"),
                    None => r,
                })
                .collect();
            (key, refs)
        })
        .collect();
    assert_eq!(references(&model), expected);
    assert_eq!(model.source_refs(left), vec!["#io_tool_1.result"]);
    assert_eq!(model.source_refs(right), vec!["#renamed.result", "#inFile"]);
    assert_eq!((model.nodes().len(), model.connections().len()), counts);
    assert_consistent(&model);
}

#[test]
fn test_change_io_node_id() {
    let mut model = one_step();
    let connections = model.connections().len();
    let nodes = model.nodes().len();
    let input = model.inputs()[0].key();
    let output = model.outputs()[0].key();

    model.change_io_node_id(input, "new_id").unwrap();
    model.change_io_node_id(output, "new_out").unwrap();

    assert_eq!(model.input(input).unwrap().id(), "new_id");
    assert_eq!(model.output(output).unwrap().id(), "new_out");
    assert_eq!(model.source_refs(step_input(&model, 0, 3)), vec!["#new_id"]);
    assert_eq!(model.source_refs(step_input(&model, 0, 2)), vec!["#reference"]);
    assert_eq!(model.connections().len(), connections);
    assert_eq!(model.nodes().len(), nodes);
    assert_consistent(&model);
}

#[test]
fn test_change_io_node_id_rejects_bad_ids() {
    let mut model = one_step();
    let before = model.to_document();
    let input = model.inputs()[0].key();
    let taken = model.inputs()[1].id().to_string();

    let err = model.change_io_node_id(input, &taken).unwrap_err();
    assert!(err.to_string().contains("ID already exists on graph"));

    let err = model.change_io_node_id(input, "-char-problems!").unwrap_err();
    assert!(err.to_string().contains("illegal characters"));

    let err = model.change_io_node_id(input, "").unwrap_err();
    assert!(err.to_string().contains("must be set"));
    assert_eq!(err.identifier_reason(), Some(IdentifierError::Empty));

    // A step id is just as taken as a parameter id.
    let err = model.change_io_node_id(input, "io_tool").unwrap_err();
    assert_eq!(err.identifier_reason(), Some(IdentifierError::Duplicate));

    assert_eq!(model.to_document(), before);
}

// -------------------------------------------------------------------------
// Removal
// -------------------------------------------------------------------------

#[test]
fn test_remove_input_by_connection_id() {
    let mut model = two_step();
    let inputs = model.inputs().len();
    let connections = model.connections().len();
    let nodes = model.nodes().len();
    let port = step_input(&model, 0, 0);
    let source_id = model.source_id(model.inputs()[0].key()).unwrap();
    assert!(model.source_refs(port).contains(&source_id));

    let connection_id = model.connection_id(model.inputs()[0].key()).unwrap();
    model.remove_input(&connection_id).unwrap();

    assert_eq!(model.inputs().len(), inputs - 1);
    assert_eq!(model.connections().len(), connections - 1);
    assert_eq!(model.nodes().len(), nodes - 1);
    assert!(model.port(port).unwrap().source().is_empty());
    assert_consistent(&model);
}

#[test]
fn test_remove_output() {
    let mut model = two_step();
    let outputs = model.outputs().len();
    let connections = model.connections().len();
    let nodes = model.nodes().len();

    model.remove_output("in/result/result").unwrap();

    assert_eq!(model.outputs().len(), outputs - 1);
    assert_eq!(model.connections().len(), connections - 2);
    assert_eq!(model.nodes().len(), nodes - 1);
    assert_consistent(&model);
}

#[test]
fn test_remove_missing_parameter_is_not_found() {
    let mut model = two_step();
    let before = model.to_document();

    assert!(matches!(
        model.remove_input("out/nope/nope"),
        Err(WorkflowModelError::NotFound(_))
    ));
    assert!(matches!(
        model.remove_output("in/nope/nope"),
        Err(WorkflowModelError::NotFound(_))
    ));
    assert_eq!(model.to_document(), before);
}

#[test]
fn test_remove_step_scrubs_references() {
    let mut model = two_step();
    let steps = model.steps().len();
    let connections = model.connections().len();
    let nodes = model.nodes().len();
    let removed_ref = model.source_id(step_output(&model, 0, 0)).unwrap();
    let target = step_input(&model, 1, 0);
    let output = model.outputs()[0].key();
    assert!(model.source_refs(target).contains(&removed_ref));
    assert!(model.source_refs(output).contains(&removed_ref));

    let step = model.steps()[0].key();
    model.remove_step(step).unwrap();

    assert_eq!(model.steps().len(), steps - 1);
    assert_eq!(model.nodes().len(), nodes - 3);
    assert_eq!(model.connections().len(), connections - 3);
    assert!(!model.source_refs(target).contains(&removed_ref));
    assert_eq!(model.source_refs(output), vec!["#io_tool_1.result"]);
    assert_eq!(model.inputs().len(), 1);
    assert_consistent(&model);
}

#[test]
fn test_remove_step_by_connection_id() {
    let mut model = two_step();
    model.remove_step("io_tool_1").unwrap();
    assert_eq!(model.steps().len(), 1);
    assert_eq!(model.source_refs(model.outputs()[0].key()), vec!["#io_tool.result"]);
    assert_consistent(&model);
}

// -------------------------------------------------------------------------
// createInputFromPort / createOutputFromPort
// -------------------------------------------------------------------------

#[test]
fn test_create_input_from_port() {
    let mut model = one_step();
    let inputs = model.inputs().len();
    let nodes = model.nodes().len();
    let connections = model.connections().len();
    let port = step_input(&model, 0, 0);

    let input = model.create_input_from_port(port).unwrap();

    assert_eq!(model.inputs().len(), inputs + 1);
    assert_eq!(model.nodes().len(), nodes + 1);
    assert_eq!(model.connections().len(), connections + 1);
    assert!(model
        .source_refs(port)
        .contains(&model.source_id(input).unwrap()));
    assert_eq!(model.port(port).unwrap().status(), PortStatus::Editable);
    assert_consistent(&model);
}

#[test]
fn test_create_output_from_port() {
    let mut model = one_step();
    let outputs = model.outputs().len();
    let nodes = model.nodes().len();
    let connections = model.connections().len();
    let port = step_output(&model, 0, 0);

    let output = model.create_output_from_port(port).unwrap();

    assert_eq!(model.outputs().len(), outputs + 1);
    assert_eq!(model.nodes().len(), nodes + 1);
    assert_eq!(model.connections().len(), connections + 1);
    assert!(model
        .source_refs(output)
        .contains(&model.source_id(port).unwrap()));
    assert_consistent(&model);
}

#[test]
fn test_load_rejects_illegal_step_id() {
    init();
    let result = WorkflowModel::from_json(
        &json!({
            "id": "dotted",
            "steps": [{"id": "a.b", "out": [{"id": "out", "status": "port"}]}]
        })
        .to_string(),
    );

    let err = result.unwrap_err();
    assert_eq!(err.identifier_reason(), Some(IdentifierError::IllegalCharacters));
}

#[test]
fn test_saved_model_loads_back() {
    let mut model = one_step();
    let port = step_output(&model, 0, 0);
    model.create_output_from_port(port).unwrap();
    model.expose_port(step_input(&model, 0, 1)).unwrap();

    let reloaded = WorkflowModel::from_json(&model.to_json().unwrap()).unwrap();
    assert_eq!(reloaded.to_document(), model.to_document());
    assert_consistent(&reloaded);
}

// -------------------------------------------------------------------------
// connect
// -------------------------------------------------------------------------

#[test]
fn test_connect_adds_connection_and_source() {
    let mut model = two_step();
    let connections = model.connections().len();
    let source = model.inputs()[0].key();
    let destination = step_input(&model, 1, 0);

    model.connect(source, destination).unwrap();

    assert_eq!(model.connections().len(), connections + 1);
    assert!(model
        .source_refs(destination)
        .contains(&model.source_id(source).unwrap()));
    assert_eq!(
        model.source_refs(destination),
        vec!["#io_tool.result", "#inFile"]
    );
    assert_consistent(&model);
}

#[test]
fn test_connect_rejects_unresolved_source() {
    let mut model = two_step();
    let before = model.to_document();
    let destination = step_input(&model, 1, 0);

    let err = model.connect("in/io_tool/inFile", destination).unwrap_err();
    assert!(matches!(
        err,
        WorkflowModelError::InvalidArgument { argument: "source", .. }
    ));
    assert!(err.to_string().contains("source to be instanceof"));
    assert_eq!(model.to_document(), before);
}

#[test]
fn test_connect_rejects_unresolved_destination() {
    let mut model = two_step();
    let before = model.to_document();
    let source = model.inputs()[0].key();

    let err = model.connect(source, "out/io_tool_1/result").unwrap_err();
    assert!(err.to_string().contains("destination to be instanceof"));
    assert_eq!(model.to_document(), before);
}

#[test]
fn test_connect_rejects_removed_node() {
    let mut model = two_step();
    let source = step_output(&model, 0, 0);
    let destination = step_input(&model, 1, 0);
    let step = model.steps()[0].key();
    model.remove_step(step).unwrap();

    assert!(matches!(
        model.connect(source, destination),
        Err(WorkflowModelError::InvalidArgument { argument: "source", .. })
    ));
}

// -------------------------------------------------------------------------
// Mixed sequences
// -------------------------------------------------------------------------

#[test]
fn test_editing_session_stays_consistent() {
    let mut model = two_step();
    let added = model.add_step_from_process(
        Process::new("merge")
            .with_input("left", json!("File"))
            .with_input("right", json!("File"))
            .with_output("merged", json!("File")),
    );
    let left = model.step(added).unwrap().inputs()[0];
    let right = model.step(added).unwrap().inputs()[1];
    let merged = model.step(added).unwrap().outputs()[0];

    model.include_port(left).unwrap();
    let (upstream, sibling) = (step_output(&model, 0, 0), step_output(&model, 1, 0));
    model.connect(upstream, left).unwrap();
    model.connect(sibling, left).unwrap();
    model.expose_port(right).unwrap();
    model.expose_port(merged).unwrap();
    assert_consistent(&model);

    let first = model.steps()[0].key();
    model.change_step_id(first, "first").unwrap();
    assert_eq!(model.source_refs(left), vec!["#first.result", "#io_tool_1.result"]);

    model.remove_step("io_tool_1").unwrap();
    assert_eq!(model.source_refs(left), vec!["#first.result"]);
    assert_consistent(&model);

    model.clear_port(right).unwrap();
    model.include_port(merged).unwrap();
    assert!(model.output_by_id("merged").is_none());
    assert_consistent(&model);

    let reloaded = WorkflowModel::from_json(&model.to_json().unwrap()).unwrap();
    assert_eq!(reloaded.to_document(), model.to_document());
}
