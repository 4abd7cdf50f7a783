//! N-Triples writer: one triple per line, absolute IRIs only.

use super::{Term, TripleGraph};

pub(super) fn write(graph: &TripleGraph) -> String {
    let mut out = String::with_capacity(graph.len() * 96);
    for triple in graph.triples() {
        line(&mut out, triple.subject(), triple.predicate().as_str(), triple.object());
    }
    out
}

fn line(out: &mut String, subj: &Term, pred: &str, obj: &Term) {
    out.push_str(&subj.to_string());
    out.push_str(" <");
    out.push_str(pred);
    out.push_str("> ");
    out.push_str(&obj.to_string());
    out.push_str(" .\n");
}
