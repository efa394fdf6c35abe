use casm::symbols::{Resolution, Unresolved};
use casm::{OutputImage, Status, SymbolError, SymbolTable, WordStore};

#[test]
fn define_then_query() {
    let mut img = OutputImage::default();
    let mut t = SymbolTable::new();
    for (i, l) in ('A'..='Z').enumerate() {
        t.define(l, i as u16 * 3, &mut img).unwrap();
    }
    for (i, l) in ('A'..='Z').enumerate() {
        assert_eq!(t.status(l).unwrap(), Status::Defined);
        assert_eq!(t.value(l).unwrap(), Some(i as u16 * 3));
        // lower case names the same slot
        assert_eq!(t.value(l.to_ascii_lowercase()).unwrap(), Some(i as u16 * 3));
    }
}

#[test]
fn redefinition_is_rejected_and_keeps_value() {
    let mut img = OutputImage::default();
    let mut t = SymbolTable::new();
    t.define('q', 5, &mut img).unwrap();
    let err = t.define('Q', 9, &mut img).unwrap_err();
    assert_eq!(err, SymbolError::AlreadyDefined { label: 'Q', value: 5 });
    assert_eq!(t.value('Q').unwrap(), Some(5));
}

#[test]
fn unused_has_no_value() {
    let t = SymbolTable::new();
    for l in 'A'..='Z' {
        assert_eq!(t.status(l).unwrap(), Status::Unused);
        assert_eq!(t.value(l).unwrap(), None);
    }
    assert!(t.finalize().is_empty());
    assert!(t.entries().is_empty());
}

#[test]
fn non_letters_are_invalid() {
    let mut img = OutputImage::default();
    let mut t = SymbolTable::new();
    assert_eq!(t.status('1'), Err(SymbolError::InvalidSymbol('1')));
    assert_eq!(t.value('@'), Err(SymbolError::InvalidSymbol('@')));
    assert_eq!(t.define('[', 0, &mut img), Err(SymbolError::InvalidSymbol('[')));
    assert_eq!(t.reference(' ', 0), Err(SymbolError::InvalidSymbol(' ')));
}

#[test]
fn reference_records_every_forward_use() {
    let mut t = SymbolTable::new();
    assert_eq!(t.reference('B', 0).unwrap(), Resolution::Pending);
    assert_eq!(t.status('B').unwrap(), Status::Undefined);
    assert_eq!(t.value('B').unwrap(), None);
    assert_eq!(t.reference('B', 4).unwrap(), Resolution::Pending);
    assert_eq!(t.pending('B').unwrap(), &[0, 4]);
}

#[test]
fn define_patches_all_pending_words() {
    let mut img = OutputImage::default();
    let mut t = SymbolTable::new();
    img.push(6 << 10).unwrap(); // BRA B
    t.reference('B', 0).unwrap();
    img.push(7 << 10).unwrap(); // INP
    img.push(4 << 10).unwrap(); // BZE B
    t.reference('B', 2).unwrap();

    let def = t.define('B', 3, &mut img).unwrap();
    assert_eq!(def.patched, vec![0, 2]);
    assert_eq!(img.read_word(0).unwrap(), (6 << 10) | 3);
    assert_eq!(img.read_word(1).unwrap(), 7 << 10);
    assert_eq!(img.read_word(2).unwrap(), (4 << 10) | 3);
    assert_eq!(t.status('B').unwrap(), Status::Defined);
    assert!(t.pending('B').unwrap().is_empty());
}

#[test]
fn reference_after_definition_reads_value() {
    let mut img = OutputImage::default();
    let mut t = SymbolTable::new();
    t.define('A', 12, &mut img).unwrap();
    assert_eq!(t.reference('A', 40).unwrap(), Resolution::Known(12));
    assert!(t.pending('A').unwrap().is_empty());
}

#[test]
fn pending_use_on_defined_symbol_is_an_invariant_error() {
    let mut img = OutputImage::default();
    let mut t = SymbolTable::new();
    t.define('A', 1, &mut img).unwrap();
    assert_eq!(t.add_undefined('A', 3), Err(SymbolError::PendingOnDefined('A')));
}

#[test]
fn patch_outside_image_fails() {
    let mut img = OutputImage::default();
    let mut t = SymbolTable::new();
    t.reference('Z', 7).unwrap();
    assert!(matches!(t.define('Z', 1, &mut img), Err(SymbolError::Patch(_))));
}

#[test]
fn finalize_lists_each_use() {
    let mut img = OutputImage::default();
    let mut t = SymbolTable::new();
    t.reference('C', 5).unwrap();
    t.reference('A', 2).unwrap();
    t.reference('C', 1).unwrap();
    img.push(0).unwrap();
    t.reference('D', 0).unwrap();
    t.define('D', 0, &mut img).unwrap();
    assert_eq!(
        t.finalize(),
        vec![
            Unresolved { label: 'C', location: 1 },
            Unresolved { label: 'A', location: 2 },
            Unresolved { label: 'C', location: 5 },
        ]
    );
}

#[test]
fn reset_forgets_everything() {
    let mut img = OutputImage::default();
    let mut t = SymbolTable::new();
    t.define('A', 1, &mut img).unwrap();
    t.reference('B', 0).unwrap();
    t.reset();
    assert_eq!(t.status('A').unwrap(), Status::Unused);
    assert_eq!(t.status('B').unwrap(), Status::Unused);
    t.define('A', 2, &mut img).unwrap();
    assert_eq!(t.value('A').unwrap(), Some(2));
}
