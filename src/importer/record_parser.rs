// ==========================================
// 商品数据导入工具 - 记录解析器实现
// ==========================================
// 阶段 0: 文件读取与解析（纯结构化，不校验内容）
// 支持: 带表头的分隔文本（默认逗号），标准引号转义
// 行号: 每条逻辑记录占一个行号（引号内换行不另计），空行同样计数
// ==========================================

use crate::domain::product::RawRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::product_importer_trait::RecordParser;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// 数据行起始行号（第 1 行为表头）
pub const FIRST_DATA_LINE: usize = 2;

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct CsvRecordParser {
    delimiter: u8,
}

impl Default for CsvRecordParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvRecordParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true) // 允许行长度不一致，列数由调用方检查
            .trim(Trim::All);
        builder
    }

    /// 打开 Feed 文件，返回逐行记录流（表头已跳过）
    pub fn open(&self, file_path: &Path) -> ImportResult<FeedRecords<File>> {
        // 检查文件存在
        if !file_path.is_file() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        Ok(self.records_from(file))
    }

    /// 从任意读取源构造记录流（表头已跳过）
    pub fn records_from<R: Read>(&self, reader: R) -> FeedRecords<R> {
        FeedRecords {
            reader: BufReader::new(reader),
            parser: *self,
            header_skipped: false,
            finished: false,
            next_line: FIRST_DATA_LINE,
        }
    }
}

impl RecordParser for CsvRecordParser {
    fn parse_line(&self, raw_line: &str) -> ImportResult<Vec<String>> {
        let mut reader = self.builder().from_reader(raw_line.as_bytes());

        match reader.records().next() {
            Some(record) => Ok(record?.iter().map(str::to_string).collect()),
            None => Ok(Vec::new()),
        }
    }
}

// ==========================================
// FeedRecords - 逐行记录流
// ==========================================
// 说明:
// - 首条逻辑记录为表头，读取后丢弃
// - 引号未闭合时继续读取下一物理行，拼成一条记录
// - 空行产出零字段记录（由列数检查拒绝），保证后续行号不偏移
// - 无法解码的记录返回 UnreadableRecord（调用方记为该行错误并继续）
// - I/O 错误返回 FileReadError（调用方终止本次导入）
pub struct FeedRecords<R> {
    reader: BufReader<R>,
    parser: CsvRecordParser,
    header_skipped: bool,
    finished: bool,
    next_line: usize,
}

impl<R: Read> FeedRecords<R> {
    /// 读取一条逻辑记录的原始字节（含行尾）；None 表示已到文件末尾
    fn read_raw_record(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        loop {
            let read = self.reader.read_until(b'\n', &mut buf)?;
            if read == 0 {
                return Ok((!buf.is_empty()).then_some(buf));
            }
            // 引号成对出现才算记录结束（转义引号 "" 不改变奇偶）
            if buf.iter().filter(|&&b| b == b'"').count() % 2 == 0 {
                return Ok(Some(buf));
            }
        }
    }

    fn decode(&self, line_number: usize, raw: Vec<u8>) -> ImportResult<RawRecord> {
        let text = String::from_utf8(raw).map_err(|e| ImportError::UnreadableRecord {
            row: line_number,
            message: e.to_string(),
        })?;

        let content = text.trim_end_matches(['\r', '\n']);
        if content.is_empty() {
            return Ok(RawRecord::new(line_number, Vec::new()));
        }

        let fields = self
            .parser
            .parse_line(content)
            .map_err(|e| ImportError::UnreadableRecord {
                row: line_number,
                message: e.to_string(),
            })?;
        Ok(RawRecord::new(line_number, fields))
    }
}

impl<R: Read> Iterator for FeedRecords<R> {
    type Item = ImportResult<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if !self.header_skipped {
            self.header_skipped = true;
            match self.read_raw_record() {
                Ok(Some(_)) => {}
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ImportError::FileReadError(e.to_string())));
                }
            }
        }

        let raw = match self.read_raw_record() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.finished = true;
                return None;
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(ImportError::FileReadError(e.to_string())));
            }
        };

        let line_number = self.next_line;
        self.next_line += 1;
        Some(self.decode(line_number, raw))
    }
}
