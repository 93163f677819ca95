//! Mermaid rendering of a pipeline's stage graph.

use std::fmt::Write;

use crate::pipeline::Pipeline;
use crate::slot::INPUT_SLOT;

const START: &str = "__start__";
const END: &str = "__end__";

/// Render `pipeline` as a Mermaid flowchart.
///
/// Nodes are the stages in order between `__start__` and `__end__`. Each edge
/// is labelled with the slots the downstream stage reads from the upstream
/// one (the input payload for the first edge).
pub fn render_mermaid(pipeline: &Pipeline) -> String {
    let mut out = String::from("graph TD;\n");
    let _ = writeln!(out, "    {START}([{START}]):::first");
    for stage in pipeline.stages() {
        let _ = writeln!(out, "    {name}({name})", name = node_id(stage.name()));
    }
    let _ = writeln!(out, "    {END}([{END}]):::last");

    let input = [INPUT_SLOT.to_string()];
    let mut upstream: (&str, &[String]) = (START, &input);
    for stage in pipeline.stages() {
        let carried: Vec<&str> = stage
            .inputs()
            .iter()
            .filter(|slot| upstream.1.contains(slot))
            .map(String::as_str)
            .collect();
        push_edge(&mut out, upstream.0, &node_id(stage.name()), &carried);
        upstream = (stage.name(), stage.outputs());
    }
    push_edge(&mut out, upstream.0, END, &[]);

    out.push_str("    classDef default fill:#f2f0ff,line-height:1.2\n");
    out.push_str("    classDef first fill-opacity:0\n");
    out.push_str("    classDef last fill:#bfb6fc\n");
    out
}

fn push_edge(out: &mut String, from: &str, to: &str, label: &[&str]) {
    let from = if from == START { START.to_string() } else { node_id(from) };
    if label.is_empty() {
        let _ = writeln!(out, "    {from} --> {to};");
    } else {
        let _ = writeln!(out, "    {from} -->|{}| {to};", label.join(", "));
    }
}

/// Mermaid node ids may not contain spaces or punctuation.
fn node_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StageUpdate;
    use crate::stage::StageDescriptor;

    fn team() -> Pipeline {
        Pipeline::new(vec![
            StageDescriptor::from_fn("classifier", ["input"], ["category"], |_| {
                Ok(StageUpdate::new().text("category", "x"))
            }),
            StageDescriptor::from_fn("keywords", ["input", "category"], ["keywords"], |_| {
                Ok(StageUpdate::new().list("keywords", ["x"]))
            }),
            StageDescriptor::from_fn(
                "summarizer",
                ["input", "category", "keywords"],
                ["summary"],
                |_| Ok(StageUpdate::new().text("summary", "x")),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn renders_linear_flow() {
        let diagram = render_mermaid(&team());
        assert!(diagram.starts_with("graph TD;\n"));
        assert!(diagram.contains("    __start__ -->|input| classifier;\n"));
        assert!(diagram.contains("    classifier -->|category| keywords;\n"));
        assert!(diagram.contains("    keywords -->|keywords| summarizer;\n"));
        assert!(diagram.contains("    summarizer --> __end__;\n"));
    }

    #[test]
    fn sanitizes_node_ids() {
        assert_eq!(node_id("keyword agent"), "keyword_agent");
        assert_eq!(node_id("step-1"), "step_1");
    }

    #[test]
    fn unlabelled_edge_when_nothing_carried() {
        let pipeline = Pipeline::new(vec![
            StageDescriptor::from_fn("a", ["input"], ["x"], |_| {
                Ok(StageUpdate::new().text("x", ""))
            }),
            StageDescriptor::from_fn("b", ["input"], ["y"], |_| {
                Ok(StageUpdate::new().text("y", ""))
            }),
        ])
        .unwrap();
        let diagram = render_mermaid(&pipeline);
        assert!(diagram.contains("    a --> b;\n"));
    }
}
