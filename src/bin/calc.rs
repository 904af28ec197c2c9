use clap::Parser;
use prework_toolkit::CalcArgs;

fn main() {
    // 未指定運算時 clap 會以用法錯誤（退出碼 2）結束
    let args = CalcArgs::parse();
    let operation = args.operation();

    match operation.describe(args.n1, args.n2) {
        Ok(sentence) => println!("{}", sentence),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
