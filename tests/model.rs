//! Context model tests driven through the public coder API.

use ppmz::{Decoder, Encoder, FrequencyTable, PpmModel, Precision};

const A: usize = 0;
const B: usize = 1;
const ESC: usize = 2;

/// Codes `symbols` with a fresh model, keeping history the way the driver does.
fn encode(order: i32, symbol_limit: usize, escape: usize, symbols: &[usize]) -> Vec<u8> {
    let mut model = PpmModel::new(order, symbol_limit, escape).unwrap();
    let mut history: Vec<usize> = Vec::new();
    let mut encoder = Encoder::new(Precision::default(), Vec::new());
    for &s in symbols {
        model.encode_symbol(&history, s, &mut encoder).unwrap();
        model.increment_contexts(&history, s).unwrap();
        push(&mut history, s, model.max_history());
    }
    encoder.finish().unwrap()
}

fn decode(
    order: i32,
    symbol_limit: usize,
    escape: usize,
    bytes: &[u8],
    count: usize,
) -> (PpmModel, Vec<usize>) {
    let mut model = PpmModel::new(order, symbol_limit, escape).unwrap();
    let mut history: Vec<usize> = Vec::new();
    let mut decoder = Decoder::new(Precision::default(), bytes).unwrap();
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let s = model.decode_symbol(&history, &mut decoder).unwrap();
        model.increment_contexts(&history, s).unwrap();
        push(&mut history, s, model.max_history());
        out.push(s);
    }
    (model, out)
}

fn push(history: &mut Vec<usize>, symbol: usize, capacity: usize) {
    if capacity == 0 {
        return;
    }
    if history.len() == capacity {
        history.pop();
    }
    history.insert(0, symbol);
}

#[test]
fn test_three_symbol_scenario_decodes_and_adapts() {
    let symbols = [A, A, B, A];
    let bytes = encode(0, 3, ESC, &symbols);
    let (model, decoded) = decode(0, 3, ESC, &bytes, symbols.len());
    assert_eq!(decoded, symbols);

    let root = model.context(model.root().unwrap()).frequencies();
    assert_eq!(root.get(A).unwrap(), 3);
    assert_eq!(root.get(B).unwrap(), 1);
    assert_eq!(root.get(ESC).unwrap(), 1);
    assert_eq!(model.context_count(), 1);
}

#[test]
fn test_second_occurrence_is_cheaper_than_first() {
    // The first A escapes (1/1, free) then costs log2(3) bits in the flat
    // table; the second A is coded at the root with probability 1/2.
    let one = encode(0, 3, ESC, &[A]);
    let many = encode(0, 3, ESC, &[A; 64]);
    assert!(many.len() < 64 / 8 + one.len() + 2);
}

#[test]
fn test_unseen_symbols_escape_to_flat_table() {
    // 200 only ever appears after contexts for other bytes already exist.
    let mut symbols: Vec<usize> = b"abcabcabcabc".iter().map(|&b| usize::from(b)).collect();
    symbols.push(200);
    symbols.extend(b"abc".iter().map(|&b| usize::from(b)));
    symbols.push(201);

    for order in 0..=3 {
        let bytes = encode(order, 257, 256, &symbols);
        let (_, decoded) = decode(order, 257, 256, &bytes, symbols.len());
        assert_eq!(decoded, symbols, "order {}", order);
    }
}

#[test]
fn test_order_minus_one_is_history_independent() {
    let symbols = [5, 5, 5, 9, 250, 0];
    let bytes = encode(-1, 257, 256, &symbols);
    let (model, decoded) = decode(-1, 257, 256, &bytes, symbols.len());
    assert_eq!(decoded, symbols);
    assert_eq!(model.context_count(), 0);
    assert!(model.root().is_none());
}

#[test]
fn test_context_tree_depth_is_bounded_by_order() {
    let symbols: Vec<usize> = b"abracadabra".iter().map(|&b| usize::from(b)).collect();
    for order in 0..=4 {
        let bytes = encode(order, 257, 256, &symbols);
        let (model, _) = decode(order, 257, 256, &bytes, symbols.len());
        assert_eq!(model.max_depth(), Some(order as u32));

        // "ab" was seen: the path for history [b, a] exists from order 2 up.
        let path = [usize::from(b'b'), usize::from(b'a')];
        let reachable = model.lookup_path(&path[..order.min(2) as usize]);
        assert!(reachable.is_some());
    }
}
