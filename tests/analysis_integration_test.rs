use std::path::PathBuf;
use testmap::analysis::{run_analysis, AnalysisInput};

fn input_from(sources: &[(&str, &str)], cmake: &str) -> AnalysisInput {
    AnalysisInput {
        build_files: vec![(PathBuf::from("CMakeLists.txt"), cmake.to_string())],
        sources: sources
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect(),
        manifest: None,
        fallback_name: "fallback".to_string(),
        parallel: false,
    }
}

const CMAKE: &str = r#"
cmake_minimum_required(VERSION 3.16)
project(simple_stream)
set(CMAKE_CXX_STANDARD 17)
find_package(OpenSSL REQUIRED)
add_library(stream_core src/frame.cpp src/socket.cpp)
add_executable(stream_cli src/main.cpp)
"#;

const FRAME_HPP: &str = r#"
#pragma once
#include <cstdint>
namespace simple::protocol {
bool parse(const uint8_t* data, size_t len);
void trace(simple::util::Writer& sink);
}
"#;

const SOCKET_HPP: &str = r#"
#pragma once
#include "simple/protocol/frame.hpp"
#include <openssl/ssl.h>
namespace simple::net {
void onDataReceived(const uint8_t* data, size_t len);
void sendFrame(const simple::protocol::Frame& frame);
}
"#;

const WRITER_HPP: &str = r#"
#pragma once
namespace simple::util {
void flushTo(simple::net::Socket& target);
std::string toHex(uint64_t value);
}
"#;

fn full_input() -> AnalysisInput {
    input_from(
        &[
            ("include/simple/protocol/frame.hpp", FRAME_HPP),
            ("include/simple/net/socket.hpp", SOCKET_HPP),
            ("include/simple/util/writer.hpp", WRITER_HPP),
        ],
        CMAKE,
    )
}

#[test]
fn project_extraction_feeds_the_report() {
    let report = run_analysis(&full_input());
    assert_eq!(report.project.name, "simple_stream");
    assert_eq!(report.project.kind, "executable");
    assert_eq!(report.project.cpp_standard, "17");
}

#[test]
fn modules_group_by_namespace_with_external_refs() {
    let report = run_analysis(&full_input());
    let names: Vec<&str> = report.modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["simple.net", "simple.protocol", "simple.util"]);

    let net = &report.modules[0];
    assert_eq!(net.namespace, "simple::net");
    assert_eq!(net.dependencies, vec!["OpenSSL".to_string()]);
}

#[test]
fn key_functions_are_ranked_and_located() {
    let report = run_analysis(&full_input());

    let parse = report
        .key_functions
        .iter()
        .find(|f| f.name == "simple::protocol::parse")
        .unwrap();
    assert_eq!(parse.priority.to_string(), "P0");
    assert_eq!(parse.file, "include/simple/protocol/frame.hpp");
    assert_eq!(parse.line, 5);
    assert_eq!(parse.signature, "bool parse(const uint8_t*, size_t)");

    let on_data = report
        .key_functions
        .iter()
        .find(|f| f.name == "simple::net::onDataReceived")
        .unwrap();
    assert_eq!(on_data.priority.to_string(), "P1");

    let to_hex = report
        .key_functions
        .iter()
        .find(|f| f.name == "simple::util::toHex")
        .unwrap();
    assert_eq!(to_hex.priority.to_string(), "P3");

    // P0 sorts before everything else.
    assert_eq!(report.key_functions[0].name, "simple::protocol::parse");
}

#[test]
fn three_module_ring_reports_exactly_one_cycle() {
    // net -> protocol (include + qualified call), protocol -> util,
    // util -> net: one ring, discovered once no matter the entry point.
    let report = run_analysis(&full_input());
    assert_eq!(report.cycles.len(), 1);
    assert_eq!(
        report.cycles[0],
        vec!["simple.net", "simple.protocol", "simple.util"]
    );
}

#[test]
fn chain_without_back_edge_has_no_cycles() {
    let input = input_from(
        &[
            (
                "include/a/one.hpp",
                "namespace a { void f(b::Thing& t); }",
            ),
            (
                "include/b/two.hpp",
                "namespace b { void g(c::Thing& t); }",
            ),
            ("include/c/three.hpp", "namespace c { void h(); }"),
        ],
        "project(chain)\n",
    );
    let report = run_analysis(&input);
    assert_eq!(report.dependency_edges.len(), 2);
    assert!(report.cycles.is_empty());
}

#[test]
fn self_reference_is_an_edge_but_never_a_cycle() {
    let input = input_from(
        &[(
            "include/app/session.hpp",
            "namespace app { void touch(app::Clock& c); }",
        )],
        "project(selfref)\n",
    );
    let report = run_analysis(&input);
    assert_eq!(report.dependency_edges.len(), 1);
    assert_eq!(report.dependency_edges[0].from, "app");
    assert_eq!(report.dependency_edges[0].to, "app");
    assert!(report.cycles.is_empty());
}

#[test]
fn global_namespace_function_is_reported_with_placeholder_module() {
    let input = input_from(
        &[(
            "include/checksum.hpp",
            "int checksum(const char* data, size_t len);\n",
        )],
        "project(globals)\n",
    );
    let report = run_analysis(&input);
    assert_eq!(report.key_functions.len(), 1);
    assert_eq!(report.key_functions[0].name, "checksum");
    assert!(report.modules.iter().any(|m| m.name == "root"));
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("inconsistent reference") && w.contains("root")));
}

#[test]
fn duplicate_target_declaration_warns_and_keeps_later() {
    let cmake = r#"
project(dup)
add_executable(stream_test old/main.cpp)
add_executable(stream_test new/main.cpp)
"#;
    let report = run_analysis(&input_from(&[], cmake));
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("duplicate") && w.contains("stream_test")));
}

#[test]
fn whole_pipeline_is_deterministic() {
    let first = serde_json::to_string(&run_analysis(&full_input())).unwrap();
    let second = serde_json::to_string(&run_analysis(&full_input())).unwrap();
    assert_eq!(first, second);

    let mut parallel_input = full_input();
    parallel_input.parallel = true;
    let parallel = serde_json::to_string(&run_analysis(&parallel_input)).unwrap();
    assert_eq!(first, parallel);
}
