//! Table-driven cost checks for the ordered engine over handcrafted
//! trees, with the unordered engine run on every case as a smoke pass.

use synrec_core::cost::Cost;
use synrec_core::parse_tree;
use synrec_rec::{dl_score, reconcile_ordered, reconcile_unordered};

struct Case {
    /// What the case demonstrates.
    label: &'static str,
    /// Erased input tree.
    input: &'static str,
    /// Expected ordered DP cost.
    cost: i64,
}

const CASES: &[Case] = &[
    Case {
        label: "no events needed",
        input: "(a b c,a b c)a b c[&&NHX:event=speciation];",
        cost: 0,
    },
    Case {
        label: "one gene lost on one side",
        input: "(a b c,a b)a b c[&&NHX:event=speciation];",
        cost: 1,
    },
    Case {
        label: "the same gene lost on both sides",
        input: "(a c,a c)a b c[&&NHX:event=speciation];",
        cost: 2,
    },
    Case {
        label: "full duplication",
        input: "(a b,a b)a b[&&NHX:event=duplication];",
        cost: 1,
    },
    Case {
        label: "prefix copy rides the substring rule",
        input: "(a b c,a b)a b c[&&NHX:event=duplication];",
        cost: 1,
    },
    Case {
        label: "infix copy rides the substring rule",
        input: "(a b c d,b c)a b c d[&&NHX:event=duplication];",
        cost: 1,
    },
    Case {
        label: "two-segment loss",
        input: "(a b c,b)a b c[&&NHX:event=speciation];",
        cost: 2,
    },
    Case {
        label: "full loss of one branch",
        input: "(a b c,)a b c[&&NHX:event=speciation];",
        cost: 1,
    },
    Case {
        label: "duplication with one branch fully lost",
        input: "(,a b)a b[&&NHX:event=duplication];",
        cost: 2,
    },
    Case {
        label: "nested speciations sharing one loss",
        input: "((a c,a c)[&&NHX:event=speciation],a b c)a b c[&&NHX:event=speciation];",
        cost: 1,
    },
    Case {
        label: "duplication under a speciation",
        input: "((a b,b)[&&NHX:event=duplication],a b)a b[&&NHX:event=speciation];",
        cost: 1,
    },
    Case {
        label: "two stacked duplications",
        input: "((a b,a)[&&NHX:event=duplication],a b)a b[&&NHX:event=duplication];",
        cost: 2,
    },
    Case {
        label: "speciation over two full losses",
        input: "((,)[&&NHX:event=speciation],a)a[&&NHX:event=speciation];",
        cost: 1,
    },
    Case {
        label: "duplicated family resolved greedily",
        input: "(a a b,a b)a a b[&&NHX:event=speciation];",
        cost: 1,
    },
];

#[test]
fn ordered_costs_match_the_table() {
    for case in CASES {
        let mut tree = parse_tree(case.input).expect(case.label);
        let cost = reconcile_ordered(&mut tree)
            .unwrap_or_else(|err| panic!("{}: {err}", case.label));
        assert_eq!(cost, Cost::Finite(case.cost), "{}", case.label);
        assert!(
            dl_score(&tree) <= usize::try_from(case.cost).expect("non-negative"),
            "{}: realized score exceeds the priced cost",
            case.label
        );
    }
}

#[test]
fn the_unordered_engine_accepts_every_table_input() {
    for case in CASES {
        let mut tree = parse_tree(case.input).expect(case.label);
        reconcile_unordered(&mut tree)
            .unwrap_or_else(|err| panic!("{}: {err}", case.label));

        // Its own guarantee holds on every case: gene content only
        // shrinks along edges.
        for node in tree.preorder() {
            let parent: std::collections::BTreeSet<_> =
                tree.event(node).synteny.genes().iter().cloned().collect();
            for child in tree.children(node) {
                let child: std::collections::BTreeSet<_> = tree
                    .event(*child)
                    .synteny
                    .genes()
                    .iter()
                    .cloned()
                    .collect();
                assert!(
                    child.is_subset(&parent),
                    "{}: child content exceeds parent content",
                    case.label
                );
            }
        }
    }
}
