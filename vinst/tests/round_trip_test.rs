// SPDX-License-Identifier: Apache-2.0

//! Builds random well-formed instantiation statements with known contents and
//! checks that extraction recovers them.

use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use vinst::{extract, extract_instance, ExtractOptions, InstanceRecord, RawFragment};

const WHITESPACE: &[&str] = &["", " ", "  ", "\n", "\t", "\n    ", " \r\n  "];
const IDENT_START: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
const IDENT_REST: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_0123456789";

struct Statement {
    text: String,
    want: InstanceRecord,
}

fn ident(rng: &mut impl Rng) -> String {
    let mut s = String::new();
    s.push(IDENT_START[rng.gen_range(0..IDENT_START.len())] as char);
    for _ in 0..rng.gen_range(0..8) {
        s.push(IDENT_REST[rng.gen_range(0..IDENT_REST.len())] as char);
    }
    s
}

fn parameter(rng: &mut impl Rng) -> String {
    if rng.gen_bool(0.5) {
        rng.gen_range(0..1024u32).to_string()
    } else {
        ident(rng)
    }
}

fn space(rng: &mut impl Rng) -> &'static str {
    WHITESPACE[rng.gen_range(0..WHITESPACE.len())]
}

/// Whitespace that is never empty, for places where two words meet.
fn gap(rng: &mut impl Rng) -> &'static str {
    WHITESPACE[rng.gen_range(1..WHITESPACE.len())]
}

fn random_statement(rng: &mut impl Rng) -> Statement {
    let module_name = ident(rng);
    let parameters: Option<Vec<String>> = if rng.gen_bool(0.5) {
        Some((0..rng.gen_range(1..5)).map(|_| parameter(rng)).collect())
    } else {
        None
    };
    let ports: Vec<(String, String)> = (0..rng.gen_range(1..7))
        .map(|_| (ident(rng), ident(rng)))
        .collect();

    let mut text = String::new();
    text.push_str(space(rng));
    text.push_str(&module_name);
    match &parameters {
        Some(params) => {
            text.push_str(space(rng));
            text.push('#');
            text.push_str(space(rng));
            text.push('(');
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    text.push(',');
                }
                text.push_str(space(rng));
                text.push_str(p);
                text.push_str(space(rng));
            }
            text.push(')');
            text.push_str(space(rng));
        }
        None => text.push_str(gap(rng)),
    }
    text.push_str(&ident(rng));
    text.push_str(space(rng));
    text.push('(');
    for (i, (declared, connected)) in ports.iter().enumerate() {
        if i > 0 {
            text.push(',');
        }
        text.push_str(space(rng));
        text.push('.');
        text.push_str(space(rng));
        text.push_str(declared);
        text.push_str(space(rng));
        text.push('(');
        text.push_str(space(rng));
        text.push_str(connected);
        text.push_str(space(rng));
        text.push(')');
        text.push_str(space(rng));
    }
    text.push(')');
    text.push_str(space(rng));
    text.push(';');

    Statement {
        text,
        want: InstanceRecord {
            module_name,
            parameters,
            port_names: ports.into_iter().map(|(_, connected)| connected).collect(),
        },
    }
}

#[test]
fn test_random_statements_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x5eed);
    for _ in 0..500 {
        let stmt = random_statement(&mut rng);
        let got = extract(&RawFragment::new(stmt.text.clone()))
            .unwrap_or_else(|e| panic!("failed on {:?}: {}", stmt.text, e));
        assert_eq!(got, stmt.want, "statement: {:?}", stmt.text);
    }
}

#[test]
fn test_random_statements_round_trip_through_locator() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    for _ in 0..100 {
        let stmt = random_statement(&mut rng);
        let source = format!(
            "module tb;\n  // Instance of {}\n{}\nendmodule\n",
            stmt.want.module_name, stmt.text
        );
        let got = extract_instance(&source, &ExtractOptions::default())
            .unwrap_or_else(|e| panic!("failed on {:?}: {}", source, e));
        assert_eq!(got, stmt.want);
    }
}

#[test]
fn test_dropping_a_close_paren_never_yields_a_record() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    for _ in 0..100 {
        let stmt = random_statement(&mut rng);
        let cut = stmt.text.rfind(')').unwrap();
        let mut broken = stmt.text.clone();
        broken.remove(cut);
        assert!(
            extract(&RawFragment::new(broken.clone())).is_err(),
            "accepted {:?}",
            broken
        );
    }
}
