use ordex_core::{BPTree, Comparator};

fn main() {
    println!("B+ Tree Index Demo\n");

    let mut tree = BPTree::new(4).expect("branching factor 4 is valid");
    println!("Created index with branching factor {}", tree.branching_factor());
    println!("Empty: {}, Size: {}\n", tree.is_empty(), tree.size());

    println!("Inserting elements...");
    for i in [5, 2, 8, 1, 9, 3, 7, 4, 6, 5] {
        tree.insert(i, format!("value_{}", i)).expect("integer keys are ordered");
        println!("  Inserted {} => value_{}", i, i);
    }
    println!("Size: {}, Height: {}\n", tree.size(), tree.height());

    println!("Tree structure:\n{}", tree);

    println!("Get operations:");
    for i in [1, 5, 9, 10] {
        match tree.get(&i) {
            Some(v) => println!("  get({}) = {}", i, v),
            None => println!("  get({}) = None", i),
        }
    }

    println!("\nRange searches around 5:");
    for comparator in [Comparator::LessOrEqual, Comparator::Equal, Comparator::GreaterOrEqual] {
        println!("  {} 5: {:?}", comparator, tree.range_search_by(&5, comparator));
    }

    println!("\nUnknown comparator '<': {:?}", tree.range_search(&5, "<"));
}
