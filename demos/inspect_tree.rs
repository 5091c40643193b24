//! Parse SQL and walk the grouped token tree.

fn main() {
    let input = "select a.id, count(*) as n from accounts a where a.active = 1 group by a.id;";

    for stmt in sqlindent::parse(input) {
        println!("Statement type: {}", stmt.get_type());

        let root = stmt.root();
        for sub in stmt.get_sublists(root) {
            let kind = stmt
                .group_kind(sub)
                .map_or_else(String::new, |kind| kind.to_string());
            print!("  {kind}: {:?}", stmt.value(sub));
            if let Some(alias) = stmt.get_alias(sub) {
                print!(" (alias {alias})");
            }
            println!();
        }

        println!("\nTree:\n{}", stmt.pretty_tree(root, Some(2)));
    }

    println!("Split: {:?}", sqlindent::split("select 1; select 2"));
}
