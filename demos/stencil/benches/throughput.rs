use divan::{Bencher, black_box};
use scankit::{NodeTree, Parser};
use stencil::Stencil;

fn main() {
    divan::main();
}

const SAMPLE_LINES: &[&str] = &[
    "Dear {{name}},\n",
    "your order {#upper {{order}}#} has shipped{?, tracking {{tracking}}?}.\n",
    "{#trim   Thanks for shopping with us!   #}\n",
    "Plain text with no tags at all, just to pad things out.\n",
];

const ARGS: &[(&str, &str)] = &[("name", "Ada"), ("order", "a-113")];

/// Generate a template with N lines cycling through the samples
fn generate_template(count: usize) -> String {
    let mut result = String::with_capacity(count * 64);
    for i in 0..count {
        result.push_str(SAMPLE_LINES[i % SAMPLE_LINES.len()]);
    }
    result
}

#[divan::bench(
    name = "scan",
    args = [10, 100, 1000, 10_000],
)]
fn bench_scan(bencher: Bencher, n: usize) {
    let stencil = Stencil::new().unwrap();
    let input = generate_template(n);

    bencher
        .counter(divan::counter::BytesCount::new(input.len()))
        .bench(|| black_box(Parser::new(scankit::Grammar::lexer(&stencil), &input).parse().unwrap()));
}

#[divan::bench(
    name = "node_tree",
    args = [10, 100, 1000, 10_000],
)]
fn bench_node_tree(bencher: Bencher, n: usize) {
    let stencil = Stencil::new().unwrap();
    let input = generate_template(n);

    bencher.bench(|| {
        let tree = NodeTree::parse(&stencil, &input).unwrap();
        black_box(tree.root().descendants().count())
    });
}

#[divan::bench(
    name = "render",
    args = [10, 100, 1000, 10_000],
)]
fn bench_render(bencher: Bencher, n: usize) {
    let stencil = Stencil::new().unwrap();
    let input = generate_template(n);

    bencher
        .counter(divan::counter::BytesCount::new(input.len()))
        .bench(|| black_box(stencil.render(&input, ARGS.iter().copied()).unwrap()));
}
