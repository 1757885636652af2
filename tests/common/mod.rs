// tests/common/mod.rs
//! Shared fixtures for integration tests.
#![allow(dead_code)]

use copycat_core::SourceFile;

pub const SUM_AND_MAX: &str = r#"
def calculate_sum(numbers):
    total = 0
    for num in numbers:
        total += num
    return total

def find_max(numbers):
    maximum = numbers[0]
    for num in numbers[1:]:
        if num > maximum:
            maximum = num
    return maximum
"#;

pub const SUM_VALUES: &str = r#"
def sum_values(data):
    result = 0
    for value in data:
        result += value
    return result

def get_maximum(data):
    max_val = data[0]
    for val in data[1:]:
        if val > max_val:
            max_val = val
    return max_val
"#;

pub const PRODUCT_AND_MIN: &str = r#"
def multiply_list(numbers):
    product = 1
    for num in numbers:
        product *= num
    return product

def find_min(numbers):
    minimum = numbers[0]
    for num in numbers[1:]:
        if num < minimum:
            minimum = num
    return minimum
"#;

pub const CALCULATOR: &str = r#"
class Calculator:
    def add(self, a, b):
        return a + b
    
    def subtract(self, a, b):
        return a - b
    
    def multiply(self, a, b):
        return a * b
"#;

pub const BUBBLE_SORT: &str = r#"
def bubble_sort(arr):
    n = len(arr)
    for i in range(n):
        for j in range(0, n-i-1):
            if arr[j] > arr[j+1]:
                arr[j], arr[j+1] = arr[j+1], arr[j]
    return arr
"#;

pub const RENAMED_SUM_AND_MAX: &str = r#"
# Very similar to file1
def calculate_sum(nums):
    sum_val = 0
    for n in nums:
        sum_val += n
    return sum_val

def find_max(nums):
    max_val = nums[0]
    for n in nums[1:]:
        if n > max_val:
            max_val = n
    return max_val
"#;

/// `SUM_AND_MAX` with a leading comment line.
pub fn commented_sum_and_max() -> String {
    format!("# running totals\n{SUM_AND_MAX}")
}

/// Six unrelated-ish files plus one near-copy of the first.
pub fn corpus() -> Vec<SourceFile> {
    vec![
        SourceFile::new("file1.py", SUM_AND_MAX),
        SourceFile::new("file2.py", SUM_VALUES),
        SourceFile::new("file3.py", PRODUCT_AND_MIN),
        SourceFile::new("file4.py", CALCULATOR),
        SourceFile::new("file5.py", BUBBLE_SORT),
        SourceFile::new("file6.py", RENAMED_SUM_AND_MAX),
        SourceFile::new("file7.py", commented_sum_and_max()),
    ]
}
